//! Resources served by the profiles service

pub mod contact;
pub mod contact_type;
pub mod course;
pub mod interest;
pub mod profile;

pub use contact::{
    EmailInput, PatchEmailInput, PatchPhoneInput, PhoneInput, PhoneView, ProfileEmail,
    ProfilePhone,
};
pub use contact_type::ContactType;
pub use course::Course;
pub use interest::Interest;
pub use profile::{CreateProfileInput, PatchProfileInput, Profile, ProfileView};
