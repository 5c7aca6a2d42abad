//! Applicant-facing e-mails. Every interpolated value is HTML-escaped.

pub struct Email {
    pub subject: String,
    pub html: String,
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(name: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; color: #222;">
    <p>Dear {name},</p>
    {body}
    <p>Best regards,<br/>The recruitment team</p>
  </body>
</html>"#,
        name = escape(name),
    )
}

pub fn application_approved(name: &str, title: &str, company: &str) -> Email {
    let body = format!(
        "<p>Congratulations! Your application for <strong>{}</strong> at <strong>{}</strong> \
         has been approved. The company will contact you about the next steps.</p>",
        escape(title),
        escape(company),
    );

    Email {
        subject: format!("Your application for {title} has been approved"),
        html: layout(name, &body),
    }
}

pub fn application_rejected(name: &str, title: &str, company: &str) -> Email {
    let body = format!(
        "<p>Thank you for applying for <strong>{}</strong> at <strong>{}</strong>. \
         After careful review the company has decided not to move forward with your \
         application.</p><p>We wish you the best in your search.</p>",
        escape(title),
        escape(company),
    );

    Email { subject: format!("Update on your application for {title}"), html: layout(name, &body) }
}
