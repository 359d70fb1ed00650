//! Demo data for local runs

use crate::core::error::StorageError;
use crate::core::service::DataService;
use crate::entities::{ContactType, Course, Interest, Profile, ProfileEmail, ProfilePhone};
use crate::services::Stores;
use uuid::Uuid;

const COURSES: &[&str] = &[
    "Computer Science",
    "Software Engineering",
    "Information Systems",
    "Electrical Engineering",
];

const INTERESTS: &[(&str, &str)] = &[
    ("Backend", "backend"),
    ("Frontend", "frontend"),
    ("Data Science", "data_science"),
    ("Security", "security"),
];

/// `(reference name, display name, description)`
const CONTACT_TYPES: &[(&str, &str, &str)] = &[
    ("whatsapp", "WhatsApp", "Messages through WhatsApp"),
    ("telegram", "Telegram", "Messages through Telegram"),
    ("mobile", "Mobile", "Voice calls and SMS"),
];

/// `(display name, course ids, interest ids)`
const PROFILES: &[(&str, &[i64], &[i64])] = &[
    ("Ana Souza", &[1], &[1, 3]),
    ("Ana Lima", &[2], &[2]),
    ("Bruno Araújo", &[1, 3], &[1]),
    ("Carla Conceição", &[4], &[4]),
    ("João Pereira", &[1], &[3, 4]),
    ("Mariana Antônia", &[2, 3], &[]),
];

/// Insert a small catalog, a few profiles and the contacts of the first one
pub async fn seed_demo_data(stores: &Stores) -> Result<(), StorageError> {
    for name in COURSES {
        stores.courses.create(Course::new(*name)).await?;
    }
    for (name, reference_name) in INTERESTS {
        stores
            .interests
            .create(Interest::new(*name, *reference_name))
            .await?;
    }
    for (reference_name, display_name, description) in CONTACT_TYPES {
        stores
            .contact_types
            .create(ContactType::new(
                *reference_name,
                *display_name,
                Some(description.to_string()),
            ))
            .await?;
    }

    let mut first = None;
    for (display_name, course_ids, interest_ids) in PROFILES {
        let mut profile = Profile::new(Uuid::new_v4(), *display_name, None);
        profile.course_ids = course_ids.to_vec();
        profile.interest_ids = interest_ids.to_vec();
        let profile = stores.profiles.create(profile).await?;
        first.get_or_insert(profile.id);
    }
    if let Some(profile_id) = first {
        stores
            .emails
            .create(ProfileEmail::new(profile_id, "ana.souza@example.com"))
            .await?;
        stores
            .phones
            .create(ProfilePhone::new(profile_id, "+55 11 95555-0100", Some(1)))
            .await?;
    }

    tracing::info!(
        courses = COURSES.len(),
        interests = INTERESTS.len(),
        contact_types = CONTACT_TYPES.len(),
        profiles = PROFILES.len(),
        "demo data seeded"
    );
    Ok(())
}
