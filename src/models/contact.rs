//! Contact record as exchanged with helpdesk clients.
//!
//! Every field is optional on input and zero values are omitted on output,
//! matching the `omitempty` shape of the emulated API.

use serde::{Deserialize, Serialize};

/// Numeric contact identifier (12 digits for server-assigned IDs).
pub type ContactId = i64;

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A helpdesk contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(skip_serializing_if = "is_false")]
    pub active: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,

    #[serde(skip_serializing_if = "ContactAvatar::is_empty")]
    pub avatar: ContactAvatar,

    #[serde(skip_serializing_if = "is_zero")]
    pub company_id: i64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,

    #[serde(skip_serializing_if = "ContactCustomFields::is_empty")]
    pub custom_fields: ContactCustomFields,

    #[serde(skip_serializing_if = "is_false")]
    pub deleted: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_id: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub id: ContactId,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub job_title: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub mobile: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_companies: Vec<OtherCompany>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_emails: Vec<String>,

    /// People ID: the externally supplied unique identifier that filter
    /// queries match against.
    #[serde(rename = "unique_external_id", skip_serializing_if = "String::is_empty")]
    pub people_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub time_zone: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub twitter_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_all_tickets: Option<bool>,
}

/// Avatar attachment metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactAvatar {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub avatar_url: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub id: i64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub size: i64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

impl ContactAvatar {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Tenant-specific custom fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactCustomFields {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub benefit: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub date_of_birth: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub eligibility_status: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub login_email: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub login_password: String,

    #[serde(rename = "phone_1", skip_serializing_if = "String::is_empty")]
    pub phone1: String,

    #[serde(rename = "phone_2", skip_serializing_if = "String::is_empty")]
    pub phone2: String,
}

impl ContactCustomFields {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Secondary company membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherCompany {
    pub company_id: i64,
    pub view_all_tickets: bool,
}

/// Overwrite `target` with `value` when `present`, reporting whether the
/// stored value changed.
fn overlay<T: PartialEq>(target: &mut T, value: T, present: bool) -> bool {
    if !present || *target == value {
        return false;
    }
    *target = value;
    true
}

impl Contact {
    /// Overlay the non-empty fields of `patch` onto this contact.
    ///
    /// Server-managed fields (`id`, timestamps, `active`, `deleted`) are never
    /// taken from the patch. Returns `true` if any stored value changed.
    pub fn merge_from(&mut self, patch: Contact) -> bool {
        let Contact {
            address,
            avatar,
            company_id,
            custom_fields,
            description,
            email,
            external_id,
            job_title,
            language,
            mobile,
            name,
            other_companies,
            other_emails,
            people_id,
            phone,
            tags,
            time_zone,
            twitter_id,
            view_all_tickets,
            ..
        } = patch;

        let mut changed = false;

        let present = !address.is_empty();
        changed |= overlay(&mut self.address, address, present);
        let present = !avatar.is_empty();
        changed |= overlay(&mut self.avatar, avatar, present);
        changed |= overlay(&mut self.company_id, company_id, company_id != 0);
        let present = !custom_fields.is_empty();
        changed |= overlay(&mut self.custom_fields, custom_fields, present);
        let present = !description.is_empty();
        changed |= overlay(&mut self.description, description, present);
        let present = !email.is_empty();
        changed |= overlay(&mut self.email, email, present);
        let present = !external_id.is_empty();
        changed |= overlay(&mut self.external_id, external_id, present);
        let present = !job_title.is_empty();
        changed |= overlay(&mut self.job_title, job_title, present);
        let present = !language.is_empty();
        changed |= overlay(&mut self.language, language, present);
        let present = !mobile.is_empty();
        changed |= overlay(&mut self.mobile, mobile, present);
        let present = !name.is_empty();
        changed |= overlay(&mut self.name, name, present);
        let present = !other_companies.is_empty();
        changed |= overlay(&mut self.other_companies, other_companies, present);
        let present = !other_emails.is_empty();
        changed |= overlay(&mut self.other_emails, other_emails, present);
        let present = !people_id.is_empty();
        changed |= overlay(&mut self.people_id, people_id, present);
        let present = !phone.is_empty();
        changed |= overlay(&mut self.phone, phone, present);
        let present = !tags.is_empty();
        changed |= overlay(&mut self.tags, tags, present);
        let present = !time_zone.is_empty();
        changed |= overlay(&mut self.time_zone, time_zone, present);
        let present = !twitter_id.is_empty();
        changed |= overlay(&mut self.twitter_id, twitter_id, present);
        let present = view_all_tickets.is_some();
        changed |= overlay(&mut self.view_all_tickets, view_all_tickets, present);

        changed
    }

    /// The contact-method fields, in the order errors are reported.
    pub fn contact_methods(&self) -> [(&'static str, &str); 5] {
        [
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("mobile", self.mobile.as_str()),
            ("twitter_id", self.twitter_id.as_str()),
            ("external_id", self.external_id.as_str()),
        ]
    }

    /// The fields that must not collide with another contact.
    pub fn unique_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("email", self.email.as_str()),
            ("twitter_id", self.twitter_id.as_str()),
            ("external_id", self.external_id.as_str()),
        ]
    }
}
