use crate::types::SubscriberRef;

/// `{site}/newsletter/unsubscribe` personalized with the subscriber's email/id.
pub fn unsubscribe_url(site_url: &str, subscriber: Option<&SubscriberRef>) -> String {
    personalized(site_url, "newsletter/unsubscribe", subscriber)
}

/// `{site}/newsletter/view` personalized with the subscriber's email/id.
pub fn webview_url(site_url: &str, subscriber: Option<&SubscriberRef>) -> String {
    personalized(site_url, "newsletter/view", subscriber)
}

fn personalized(site_url: &str, path: &str, subscriber: Option<&SubscriberRef>) -> String {
    let base = site_url.trim_end_matches('/');
    let Some(subscriber) = subscriber else {
        return format!("{base}/{path}");
    };
    let mut url = format!(
        "{base}/{path}?email={}",
        urlencoding::encode(&subscriber.email)
    );
    if let Some(id) = subscriber.id.as_deref() {
        url.push_str("&id=");
        url.push_str(&urlencoding::encode(id));
    }
    url
}
