//! Waitlist email templates.

/// Subject/text/html triple for an outgoing email.
pub struct WaitlistEmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl WaitlistEmailContent {
    /// Welcome email sent after joining the waitlist.
    pub fn welcome() -> Self {
        Self {
            subject: "You're on the Anteroom waitlist".to_string(),
            text: Self::text_template(),
            html: Self::html_template(),
        }
    }

    fn text_template() -> String {
        r#"You're in!

Thanks for joining the Anteroom waitlist. We're letting people in a small
batch at a time, and we'll email you as soon as your spot opens up.

If you didn't sign up for this, you can safely ignore this email.

--
The Anteroom team"#
            .to_string()
    }

    fn html_template() -> String {
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; background: #f5f5f5; }
        .container { max-width: 600px; margin: 0 auto; padding: 40px 20px; }
        .card { background: white; border-radius: 8px; padding: 40px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #1a1a1a; margin-top: 0; font-size: 24px; }
        .footer { margin-top: 32px; padding-top: 20px; border-top: 1px solid #eee; color: #888; font-size: 12px; }
    </style>
</head>
<body>
    <div class="container">
        <div class="card">
            <h1>You're in!</h1>
            <p>Thanks for joining the Anteroom waitlist. We're letting people in a small batch at a time, and we'll email you as soon as your spot opens up.</p>
            <div class="footer">
                <p>If you didn't sign up for this, you can safely ignore this email.</p>
                <p>The Anteroom team</p>
            </div>
        </div>
    </div>
</body>
</html>"#
            .to_string()
    }
}
