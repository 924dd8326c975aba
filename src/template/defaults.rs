//! Built-in templates used when nothing has been persisted yet.

use super::types::{Template, TemplateCollection};

const INQUIRY_BODY: &str = "Dear {{company}},

I am writing with a few questions about {{product}}.

{{inquiryDetails}}

I would appreciate your reply.

Kind regards,

{{sender}}
";

const INTERNSHIP_ABSENCE_BODY: &str = "{{contactPersonName}}, {{departmentName}}, {{companyName}}

My name is {{myName}}, a year {{year}} student at {{affiliation}}.

I was scheduled to attend the internship on {{internshipDate}}, but I am writing to let you know that I will be unable to attend because {{absenceReason}}.

I sincerely apologize after you kindly invited me, and I appreciate your understanding.

----------------------------------------
{{myName}}
{{affiliation}}
Mail: {{emailAddress}}
Tel: {{phoneNumber}}
----------------------------------------";

/// The seed collection: a product inquiry and an internship absence notice.
pub fn default_templates() -> TemplateCollection {
    [
        Template::new(
            "inquiry",
            "Product inquiry",
            "Inquiry about {{product}}",
            INQUIRY_BODY,
        ),
        Template::new(
            "internshipAbsence",
            "Internship absence notice",
            "Notice of absence from internship",
            INTERNSHIP_ABSENCE_BODY,
        ),
    ]
    .into_iter()
    .collect()
}
