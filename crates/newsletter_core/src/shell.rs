use crate::clean::escape_html;

/// Wraps a rendered body fragment in the email-client compatibility shell.
///
/// The preheader goes into a hidden block so inbox previews pick it up.
pub fn wrap_html(subject: &str, preheader: &str, body: &str) -> String {
    let title = escape_html(subject);
    let preheader = escape_html(preheader);
    format!(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" lang="en">
<head>
<meta http-equiv="Content-Type" content="text/html; charset=UTF-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<meta http-equiv="X-UA-Compatible" content="IE=edge" />
<meta name="x-apple-disable-message-reformatting" />
<title>{title}</title>
<!--[if mso]>
<noscript>
<xml>
<o:OfficeDocumentSettings>
<o:PixelsPerInch>96</o:PixelsPerInch>
</o:OfficeDocumentSettings>
</xml>
</noscript>
<style>table, td, div, h1, h2, p {{ font-family: Georgia, serif; }}</style>
<![endif]-->
</head>
<body style="margin:0;padding:0;background-color:#f6f3ee;">
<div style="display:none;max-height:0;overflow:hidden;mso-hide:all;">{preheader}</div>
{body}
</body>
</html>
"#
    )
}
