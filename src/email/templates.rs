//! Canned client emails sent from the admin dashboard.

use chrono::{DateTime, Local};
use serde::Serialize;

/// Available email templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTemplate {
    Password,
    CompletedRdl,
    CompletedRcs,
    ReviewUnwanted,
    ReviewUnknown,
    Error,
    General,
}

impl EmailTemplate {
    pub const ALL: [EmailTemplate; 7] = [
        Self::Password,
        Self::CompletedRdl,
        Self::CompletedRcs,
        Self::ReviewUnwanted,
        Self::ReviewUnknown,
        Self::Error,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::CompletedRdl => "completed_rdl",
            Self::CompletedRcs => "completed_rcs",
            Self::ReviewUnwanted => "review_unwanted",
            Self::ReviewUnknown => "review_unknown",
            Self::Error => "error",
            Self::General => "general",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Look up a template by name; unknown names get the general update.
    pub fn from_name(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Self::General)
    }

    pub fn subject(&self) -> &'static str {
        match self {
            Self::Password => "🔒 Document Resubmission Required - Password Protection",
            Self::CompletedRdl => "✅ RDL Document Processing Complete",
            Self::CompletedRcs => "✅ RCS Document Processing Complete",
            Self::ReviewUnwanted => "⚠️ Document Review Required - Unwanted Document Type",
            Self::ReviewUnknown => "🔍 Document Review Required - Unknown Document Type",
            Self::Error => "❌ Document Processing Error",
            Self::General => "📄 Document Processing Update",
        }
    }

    /// Render subject and body for a document.
    pub fn render(&self, ctx: &TemplateContext<'_>) -> RenderedEmail {
        let filename = ctx.filename;
        let time = ctx.time.format("%-m/%-d/%Y, %-I:%M:%S %p");
        let client = ctx.client_name.unwrap_or("Client");
        let client_line = ctx.client_name.unwrap_or("N/A");
        let processed = ctx.processed_name.unwrap_or("Processed_Document.pdf");

        let message = match self {
            Self::Password => format!(
                "Dear Client,\n\n\
                 Your document \"{filename}\" could not be processed because it is password-protected.\n\n\
                 🔒 ISSUE: Password-protected PDF detected\n\
                 📄 DOCUMENT: {filename}\n\
                 ⏰ TIME: {time}\n\n\
                 ACTION REQUIRED:\n\
                 Please resubmit your document without password protection to continue processing.\n\n\
                 If you need assistance, please contact our Document Quality Team.\n\n\
                 Thank you,\n\
                 Document Quality Team 💖"
            ),
            Self::CompletedRdl => format!(
                "Dear {client},\n\n\
                 Great news! Your Rating Decision Letter has been processed successfully.\n\n\
                 ✅ STATUS: Processing Complete\n\
                 📄 ORIGINAL: {filename}\n\
                 📋 PROCESSED AS: {processed}\n\
                 👤 CLIENT: {client_line}\n\
                 📂 DOCUMENT TYPE: Rating Decision Letter (RDL)\n\
                 ⏰ COMPLETED: {time}\n\n\
                 Your RDL document has been properly classified and filed in our system. \
                 You can now access it through your client portal.\n\n\
                 Thank you for using our document processing service!\n\n\
                 Document Quality Team 💖"
            ),
            Self::CompletedRcs => format!(
                "Dear {client},\n\n\
                 Your Records/Client Services document has been processed successfully.\n\n\
                 ✅ STATUS: Processing Complete\n\
                 📄 ORIGINAL: {filename}\n\
                 📋 PROCESSED AS: {processed}\n\
                 👤 CLIENT: {client_line}\n\
                 📂 DOCUMENT TYPE: Records/Client Services (RCS)\n\
                 ⏰ COMPLETED: {time}\n\n\
                 Your RCS authorization form has been properly processed and is now available \
                 in your client portal.\n\n\
                 Thank you for using our document processing service!\n\n\
                 Document Quality Team 💖"
            ),
            Self::ReviewUnwanted => format!(
                "Dear Client,\n\n\
                 We've reviewed your document \"{filename}\" and identified it as an unwanted document type.\n\n\
                 ⚠️ ISSUE: Unwanted document detected\n\
                 📄 DOCUMENT: {filename}\n\
                 🚫 TYPE: ID Document (Driver's License, Passport, etc.)\n\
                 ⏰ TIME: {time}\n\n\
                 ACTION REQUIRED:\n\
                 Please submit only the required documents for processing:\n\
                 • Rating Decision Letters (RDL)\n\
                 • Records/Client Services forms (RCS)\n\
                 • Other authorized documents\n\n\
                 If you believe this is an error, please contact our support team.\n\n\
                 Thank you,\n\
                 Document Quality Team 💖"
            ),
            Self::ReviewUnknown => format!(
                "Dear Client,\n\n\
                 Your document \"{filename}\" requires manual review as we couldn't automatically \
                 determine its type.\n\n\
                 🔍 ISSUE: Unknown document type\n\
                 📄 DOCUMENT: {filename}\n\
                 ❓ STATUS: Requires manual classification\n\
                 ⏰ TIME: {time}\n\n\
                 NEXT STEPS:\n\
                 Our team will manually review your document within 24-48 hours. \
                 You will receive an update once the review is complete.\n\n\
                 If you have questions about the document type or processing requirements, \
                 please contact our support team.\n\n\
                 Thank you for your patience,\n\
                 Document Quality Team 💖"
            ),
            Self::Error => format!(
                "Dear Client,\n\n\
                 We encountered an issue processing your document \"{filename}\".\n\n\
                 ❌ ISSUE: Processing error detected\n\
                 📄 DOCUMENT: {filename}\n\
                 ⏰ TIME: {time}\n\n\
                 ACTION REQUIRED:\n\
                 Please try the following:\n\
                 1. Ensure the document is not corrupted\n\
                 2. Verify the file format is supported (PDF, JPG, PNG)\n\
                 3. Resubmit the document\n\n\
                 If the issue persists, please contact our support team for assistance.\n\n\
                 Thank you,\n\
                 Document Quality Team 💖"
            ),
            Self::General => {
                let document = if filename.is_empty() {
                    "Your submitted document"
                } else {
                    filename
                };
                format!(
                    "Dear Client,\n\n\
                     We wanted to provide you with an update regarding your document processing.\n\n\
                     📄 DOCUMENT: {document}\n\
                     ⏰ TIME: {time}\n\n\
                     If you have any questions or concerns, please don't hesitate to contact \
                     our support team.\n\n\
                     Thank you,\n\
                     Document Quality Team 💖"
                )
            }
        };

        RenderedEmail {
            subject: self.subject().to_string(),
            message,
        }
    }
}

impl std::fmt::Display for EmailTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    pub filename: &'a str,
    pub client_name: Option<&'a str>,
    pub processed_name: Option<&'a str>,
    pub time: DateTime<Local>,
}

impl<'a> TemplateContext<'a> {
    pub fn new(filename: &'a str) -> Self {
        Self {
            filename,
            client_name: None,
            processed_name: None,
            time: Local::now(),
        }
    }

    pub fn with_client(mut self, client_name: Option<&'a str>, processed_name: Option<&'a str>) -> Self {
        self.client_name = client_name;
        self.processed_name = processed_name;
        self
    }
}

/// A subject and body ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_falls_back_to_general() {
        assert_eq!(EmailTemplate::from_name("completed_rdl"), EmailTemplate::CompletedRdl);
        assert_eq!(EmailTemplate::from_name("shipping"), EmailTemplate::General);
        assert_eq!(EmailTemplate::from_str("shipping"), None);
    }

    #[test]
    fn test_completed_rdl_uses_document_data() {
        let ctx = TemplateContext::new("scan_rdl.pdf")
            .with_client(Some("SARAH WILLIAMS"), Some("SARAH_WILLIAMS_RDL.pdf"));
        let email = EmailTemplate::CompletedRdl.render(&ctx);

        assert_eq!(email.subject, "✅ RDL Document Processing Complete");
        assert!(email.message.starts_with("Dear SARAH WILLIAMS,"));
        assert!(email.message.contains("📋 PROCESSED AS: SARAH_WILLIAMS_RDL.pdf"));
        assert!(email.message.contains("📄 ORIGINAL: scan_rdl.pdf"));
    }

    #[test]
    fn test_completed_without_document_data() {
        let email = EmailTemplate::CompletedRcs.render(&TemplateContext::new("auth.pdf"));
        assert!(email.message.starts_with("Dear Client,"));
        assert!(email.message.contains("📋 PROCESSED AS: Processed_Document.pdf"));
        assert!(email.message.contains("👤 CLIENT: N/A"));
    }

    #[test]
    fn test_general_without_filename() {
        let email = EmailTemplate::General.render(&TemplateContext::new(""));
        assert!(email.message.contains("📄 DOCUMENT: Your submitted document"));
    }

    #[test]
    fn test_every_template_mentions_the_file() {
        let ctx = TemplateContext::new("letter.pdf");
        for template in EmailTemplate::ALL {
            let email = template.render(&ctx);
            assert!(email.message.contains("letter.pdf"), "{}", template);
            assert_eq!(email.subject, template.subject());
        }
    }
}
