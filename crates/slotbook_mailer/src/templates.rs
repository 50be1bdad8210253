// --- File: crates/slotbook_mailer/src/templates.rs ---

// Confirmation email rendering. Customer-supplied text is HTML-escaped in the
// HTML part and left as-is in the plain-text part.

use slotbook_common::models::Appointment;
use slotbook_common::services::EmailMessage;
use slotbook_config::MailConfig;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Renders outbound emails for a given client deployment.
#[derive(Debug, Clone)]
pub struct EmailTemplates {
    frontend_url: String,
}

impl Default for EmailTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_FRONTEND_URL)
    }
}

impl EmailTemplates {
    pub fn new(frontend_url: impl Into<String>) -> Self {
        let frontend_url: String = frontend_url.into();
        Self {
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: Option<&MailConfig>) -> Self {
        config
            .and_then(|mail| mail.frontend_url.as_deref())
            .filter(|url| !url.is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Link to the client page where the customer manages this booking.
    pub fn management_url(&self, booking_id: &str) -> String {
        format!("{}/manage/{}", self.frontend_url, booking_id)
    }

    pub fn confirmation(&self, appointment: &Appointment) -> EmailMessage {
        let date = format_long_date(appointment);
        let management_url = self.management_url(&appointment.booking_id);
        let subject = format!(
            "Appointment Confirmed - Booking ID: {}",
            appointment.booking_id
        );

        let notes_html = appointment
            .notes
            .as_deref()
            .map(|notes| format!("<p><strong>Notes:</strong> {}</p>", escape_html(notes)))
            .unwrap_or_default();
        let notes_text = appointment
            .notes
            .as_deref()
            .map(|notes| format!("- Notes: {}\n", notes))
            .unwrap_or_default();

        let html_body = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <div style="background-color: #4CAF50; color: white; padding: 20px; text-align: center; border-radius: 5px 5px 0 0;">
    <h1>Appointment Confirmed!</h1>
  </div>
  <div style="background-color: #f9f9f9; padding: 20px; border-radius: 0 0 5px 5px;">
    <h2>Hello {name},</h2>
    <p>Your appointment has been successfully scheduled. Here are the details:</p>
    <div style="background-color: white; padding: 15px; margin: 20px 0; border-radius: 5px; border-left: 4px solid #4CAF50;">
      <h3>Appointment Details:</h3>
      <p><strong>Booking ID:</strong> {booking_id}</p>
      <p><strong>Date:</strong> {date}</p>
      <p><strong>Time:</strong> {time}</p>
      <p><strong>Duration:</strong> {duration} minutes</p>
      {notes_html}
    </div>
    <div style="text-align: center; margin: 30px 0;">
      <a href="{management_url}" style="background-color: #2196F3; color: white; padding: 12px 24px; text-decoration: none; border-radius: 5px; display: inline-block; font-weight: bold;">Click here to manage your booking</a>
    </div>
    <p>Please arrive 5 minutes before your scheduled time.</p>
    <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd;">
      <p style="color: #666; font-size: 14px;">Need to reschedule or cancel? Use the link above to manage your appointment online, or contact us directly.</p>
      <p style="color: #666; font-size: 14px;">Thank you for choosing our service!</p>
    </div>
  </div>
</div>"#,
            name = escape_html(&appointment.customer_name),
            booking_id = appointment.booking_id,
            date = date,
            time = appointment.appointment_time,
            duration = appointment.duration,
            notes_html = notes_html,
            management_url = management_url,
        );

        let text_body = format!(
            "{subject}\n\n\
             Hello {name},\n\n\
             Your appointment has been successfully scheduled.\n\n\
             Appointment Details:\n\
             - Booking ID: {booking_id}\n\
             - Date: {date}\n\
             - Time: {time}\n\
             - Duration: {duration} minutes\n\
             {notes_text}\n\
             Manage your booking: {management_url}\n\n\
             Please arrive 5 minutes before your scheduled time.\n\n\
             Need to reschedule or cancel? Use the link above to manage your appointment online, or contact us directly.\n\n\
             Thank you for choosing our service!\n",
            subject = subject,
            name = appointment.customer_name,
            booking_id = appointment.booking_id,
            date = date,
            time = appointment.appointment_time,
            duration = appointment.duration,
            notes_text = notes_text,
            management_url = management_url,
        );

        EmailMessage {
            to: appointment.customer_email.clone(),
            subject,
            text_body,
            html_body: Some(html_body),
        }
    }
}

/// "Thursday, January 1, 2099"
fn format_long_date(appointment: &Appointment) -> String {
    appointment
        .appointment_date
        .format("%A, %B %-d, %Y")
        .to_string()
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
