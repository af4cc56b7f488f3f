// src/services/email_templates.rs
//! HTML bodies for the three kinds of outbound email.

use chrono::NaiveDateTime;

/// "January 1, 2025 at 10:00 AM" style display for deadlines embedded in
/// email bodies.
pub fn format_deadline(deadline: &NaiveDateTime) -> String {
    deadline.format("%B %-d, %Y at %-I:%M %p").to_string()
}

pub fn reminder_email(task_name: &str, deadline_display: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; }}
        .header {{ background-color: #2563eb; color: white; padding: 20px; text-align: center; }}
        .content {{ padding: 20px; background-color: #f8fafc; }}
        .deadline {{ background-color: #e2e8f0; padding: 10px; margin: 15px 0; border-left: 4px solid #2563eb; }}
        .footer {{ padding: 20px; text-align: center; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Task Reminder</h1>
        </div>
        <div class="content">
            <h2>{}</h2>
            <div class="deadline">
                <strong>Deadline:</strong> {}
            </div>
            <p>This is a reminder about your upcoming task deadline.</p>
        </div>
        <div class="footer">
            <p>This is an automated message. Please do not reply directly to this email.</p>
        </div>
    </div>
</body>
</html>"#,
        task_name, deadline_display
    )
}

pub fn verification_code_email(code: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; background-color: #f6f9fc; }}
        h2 {{ color: #2563eb; }}
        .code {{ color: #1e40af; letter-spacing: 5px; padding: 10px; background: #e2e8f0; display: inline-block; border-radius: 4px; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>Your Verification Code</h2>
        <p>Here is your verification code for TaskMatrix:</p>
        <h1 class="code">{}</h1>
        <p>Please enter this code to verify your email address. The code expires in two minutes.</p>
        <p>If you didn't request this code, please ignore this email.</p>
    </div>
</body>
</html>"#,
        code
    )
}

pub fn password_reset_email(name: &str, reset_link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        h2 {{ color: #4bb6b7; }}
        .button {{ display: inline-block; padding: 12px 25px; background-color: #4bb6b7; color: white; text-decoration: none; border-radius: 5px; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>Password Reset Request</h2>
        <p>Hello {},</p>
        <p>We received a request to reset your TaskMatrix password.</p>
        <p>Click the link below to reset your password:</p>
        <p style="margin: 20px 0;">
            <a href="{}" class="button">Reset Password</a>
        </p>
        <p>Or copy this link: <br>{}</p>
        <p>This link will expire in 1 hour.</p>
        <p><small>If you didn't request this reset, please ignore this email.</small></p>
    </div>
</body>
</html>"#,
        name, reset_link, reset_link
    )
}
