use crate::config::EmailConfig;
use crate::error::app_error::AppError;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the address-verification email with the emailed link embedding
    /// the token. A failure here is the caller's failure: registration is
    /// reported as failed when the verification email cannot be dispatched.
    pub async fn send_verification_email(&self, to_email: &str, nickname: &str, token: &str, verify_url: &str) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::warn!("Email service is disabled, skipping verification email to {}", to_email);
            return Ok(());
        }

        let verification_link = format!("{}?token={}", verify_url, token);

        let subject = "Verify your PromptGallery email";
        let html_body = self.generate_verification_email_html(nickname, &verification_link);
        let text_body = self.generate_verification_email_text(nickname, &verification_link);

        self.send_email(to_email, subject, &html_body, &text_body).await
    }

    /// Generate HTML version of the verification email
    fn generate_verification_email_html(&self, nickname: &str, verification_link: &str) -> String {
        format!(
            r##"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Verify your PromptGallery email</title>
    <style>
        body {{
            margin: 0;
            padding: 0;
            background-color: #FAFBFC;
            color: #141517;
            font-family: Inter, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
            line-height: 1.6;
        }}

        .card {{
            max-width: 640px;
            margin: 28px auto;
            background-color: #FFFFFF;
            border: 1px solid rgba(0, 0, 0, 0.08);
            border-radius: 16px;
            padding: 28px 24px;
        }}

        .title {{
            margin: 0 0 14px;
            font-size: 28px;
            font-weight: 700;
        }}

        .body-text {{
            margin: 0 0 14px;
            color: #2E3035;
            font-size: 15px;
        }}

        .button {{
            display: inline-block;
            margin: 10px 0 20px;
            background-color: #00D4FF;
            color: #FFFFFF !important;
            text-decoration: none;
            font-size: 15px;
            font-weight: 700;
            border-radius: 12px;
            padding: 14px 22px;
        }}

        .link-box {{
            padding: 12px 14px;
            background-color: #F1F3F5;
            border: 1px solid rgba(0, 0, 0, 0.08);
            border-radius: 12px;
            color: #5C5F66;
            font-size: 12px;
            word-break: break-all;
        }}

        .footer {{
            margin-top: 18px;
            color: #5C5F66;
            font-size: 12px;
        }}
    </style>
</head>
<body>
    <div class="card">
        <h1 class="title">Welcome to PromptGallery!</h1>
        <p class="body-text">Hi {},</p>
        <p class="body-text">Click the link below to verify your email address and finish setting up your account.</p>
        <a href="{}" class="button">Verify Your Email</a>
        <p class="body-text">This link is valid for 24 hours.</p>
        <p class="body-text">If the button does not open, copy and paste this URL into your browser:</p>
        <p class="link-box">{}</p>
        <p class="footer">If you did not create a PromptGallery account, you can safely ignore this message.</p>
    </div>
</body>
</html>
"##,
            nickname, verification_link, verification_link
        )
    }

    /// Generate plain text version of the verification email
    fn generate_verification_email_text(&self, nickname: &str, verification_link: &str) -> String {
        format!(
            r#"PromptGallery | Email Verification

Hi {},

Welcome to PromptGallery! Verify your email address using the link below:
{}

This link is valid for 24 hours.

If you did not create a PromptGallery account, you can safely ignore this message.

PromptGallery
"#,
            nickname, verification_link
        )
    }

    /// Send an email using SMTP
    async fn send_email(&self, to_email: &str, subject: &str, html_body: &str, text_body: &str) -> Result<(), AppError> {
        // Build the email message
        let email = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_address)
                    .parse()
                    .map_err(|e| AppError::email(format!("Invalid from address: {}", e)))?,
            )
            .to(to_email.parse().map_err(|e| AppError::email(format!("Invalid to address: {}", e)))?)
            .subject(subject)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::email(format!("Failed to build email: {}", e)))?;

        // Configure SMTP transport
        let creds = Credentials::new(self.config.smtp_username.clone(), self.config.smtp_password.clone());

        let mailer = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::email(format!("Failed to create SMTP transport: {}", e)))?
            .credentials(creds)
            .port(self.config.smtp_port)
            .build();

        // Send the email (blocking operation, should be run in a separate thread)
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::email(format!("Failed to spawn email sending task: {}", e)))?;

        result.map_err(|e| AppError::email(format!("Failed to send email: {}", e)))?;

        tracing::info!("Verification email sent successfully to {}", to_email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: "test".to_string(),
            smtp_password: "test".to_string(),
            from_address: "noreply@promptgallery.dev".to_string(),
            from_name: "PromptGallery".to_string(),
            enabled: false,
        }
    }

    #[test]
    fn test_generate_verification_email_html() {
        let service = EmailService::new(test_config());
        let html = service.generate_verification_email_html("Alice", "https://example.com/verify?token=abc123");

        assert!(html.contains("Alice"));
        assert!(html.contains("https://example.com/verify?token=abc123"));
        assert!(html.contains("Verify Your Email"));
        assert!(html.contains("24 hours"));
    }

    #[test]
    fn test_generate_verification_email_text() {
        let service = EmailService::new(test_config());
        let text = service.generate_verification_email_text("Bob", "https://example.com/verify?token=xyz789");

        assert!(text.contains("Bob"));
        assert!(text.contains("https://example.com/verify?token=xyz789"));
        assert!(text.contains("24 hours"));
    }

    #[rocket::async_test]
    async fn disabled_service_skips_dispatch() {
        let service = EmailService::new(test_config());
        let result = service
            .send_verification_email("a@x.com", "Alice", "token", "https://example.com/verify")
            .await;
        assert!(result.is_ok());
    }
}
