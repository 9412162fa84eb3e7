//! Bundled fallback content, shown whenever the remote store is
//! unreachable, empty, or not configured. Schedule stamps are relative to
//! the current time so the visibility filter behaves the same offline as
//! online; each collection deliberately carries one future-scheduled record
//! that must stay hidden.

use chrono::{Duration, Utc};

use crate::model::{Collection, ContentRecord, Counters, LocalizedText};

pub fn seed(collection: Collection) -> Vec<ContentRecord> {
    match collection {
        Collection::News => seed_news(),
        Collection::Audio => seed_audios(),
        Collection::Video => seed_videos(),
    }
}

fn record(
    id: &str,
    kind: Collection,
    title: LocalizedText,
    description: LocalizedText,
    media_ref: Option<&str>,
    scheduled_hours_from_now: i64,
    counters: Counters,
) -> ContentRecord {
    let now = Utc::now();
    ContentRecord {
        id: id.to_string(),
        kind,
        title,
        description,
        media_ref: media_ref.map(str::to_string),
        scheduled_at: Some(now + Duration::hours(scheduled_hours_from_now)),
        is_published: Some(true),
        created_at: Some(now),
        updated_at: Some(now),
        counters,
    }
}

fn seed_news() -> Vec<ContentRecord> {
    vec![
        record(
            "seed-news-1",
            Collection::News,
            LocalizedText::new("Nouvelle campagne d'évangélisation", "New Evangelization Campaign"),
            LocalizedText::new(
                "Rejoignez-nous pour une campagne d'évangélisation exceptionnelle.",
                "Join us for an exceptional evangelization campaign.",
            ),
            Some("https://images.example.org/news/campagne.jpg"),
            -24,
            Counters { share_count: 45, download_count: None },
        ),
        record(
            "seed-news-2",
            Collection::News,
            LocalizedText::new("Conférence spirituelle ce weekend", "Spiritual Conference This Weekend"),
            LocalizedText::new(
                "Une conférence transformatrice avec des orateurs inspirants.",
                "A transformative conference with inspiring speakers.",
            ),
            Some("https://images.example.org/news/conference.jpg"),
            -2,
            Counters { share_count: 32, download_count: None },
        ),
        record(
            "seed-news-3",
            Collection::News,
            LocalizedText::new("Annonce à venir", "Upcoming Announcement"),
            LocalizedText::new(
                "Programmée pour demain; ne doit pas encore être visible.",
                "Scheduled for tomorrow; must not be visible yet.",
            ),
            None,
            24,
            Counters::default(),
        ),
    ]
}

fn seed_audios() -> Vec<ContentRecord> {
    vec![
        record(
            "seed-audio-1",
            Collection::Audio,
            LocalizedText::new("La foi qui déplace les montagnes", "Faith That Moves Mountains"),
            LocalizedText::new(
                "Une prédication puissante sur la foi inébranlable.",
                "A powerful sermon on unwavering faith.",
            ),
            Some("sermons/faith-moves-mountains.mp3"),
            -3,
            Counters { share_count: 128, download_count: Some(89) },
        ),
        record(
            "seed-audio-2",
            Collection::Audio,
            LocalizedText::new("L'amour inconditionnel de Dieu", "God's Unconditional Love"),
            LocalizedText::new(
                "Découvrez la profondeur de l'amour divin.",
                "Discover the depth of divine love.",
            ),
            Some("sermons/unconditional-love.mp3"),
            -6,
            Counters { share_count: 95, download_count: Some(67) },
        ),
        record(
            "seed-audio-3",
            Collection::Audio,
            LocalizedText::new("La prière qui transforme", "Prayer That Transforms"),
            LocalizedText::new(
                "Comment la prière peut changer votre vie.",
                "How prayer can change your life.",
            ),
            Some("sermons/prayer-transforms.mp3"),
            48,
            Counters { share_count: 0, download_count: Some(0) },
        ),
    ]
}

fn seed_videos() -> Vec<ContentRecord> {
    vec![
        record(
            "seed-video-1",
            Collection::Video,
            LocalizedText::new("Culte du dimanche", "Sunday Service"),
            LocalizedText::new(
                "Retransmission du culte dominical.",
                "Broadcast of the Sunday service.",
            ),
            Some("https://www.youtube.com/watch?v=seed-service"),
            -48,
            Counters::default(),
        ),
        record(
            "seed-video-2",
            Collection::Video,
            LocalizedText::new("Témoignages de la communauté", "Community Testimonies"),
            LocalizedText::new(
                "Des membres partagent ce que Dieu a fait dans leur vie.",
                "Members share what God has done in their lives.",
            ),
            Some("https://www.youtube.com/watch?v=seed-testimonies"),
            -12,
            Counters::default(),
        ),
        record(
            "seed-video-3",
            Collection::Video,
            LocalizedText::new("Série à venir", "Upcoming Series"),
            LocalizedText::new(
                "Première diffusion la semaine prochaine.",
                "First broadcast next week.",
            ),
            Some("https://www.youtube.com/watch?v=seed-upcoming"),
            24 * 7,
            Counters::default(),
        ),
    ]
}
