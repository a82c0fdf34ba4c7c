use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::state::AppState,
    config::{ContactInfo, SiteConfig, SocialLink, StatCounter},
    domain::initials_of,
};

/// Static home page content. Lives in configuration, not the database.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub name: String,
    pub tagline: String,
    pub contact: ContactInfo,
    pub social_links: Vec<SocialLink>,
    pub stats: Vec<StatCounter>,
    pub testimonials: Vec<TestimonialCard>,
}

/// A testimonial with its initials always filled in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestimonialCard {
    pub name: String,
    pub role: String,
    pub content: String,
    pub initials: String,
}

impl From<&SiteConfig> for SiteContent {
    fn from(site: &SiteConfig) -> Self {
        Self {
            name: site.name.clone(),
            tagline: site.tagline.clone(),
            contact: site.contact.clone(),
            social_links: site.social_links.clone(),
            stats: site.stats.clone(),
            testimonials: site
                .testimonials
                .iter()
                .map(|t| TestimonialCard {
                    name: t.name.clone(),
                    role: t.role.clone(),
                    content: t.content.clone(),
                    initials: t
                        .initials
                        .clone()
                        .unwrap_or_else(|| initials_of(&t.name)),
                })
                .collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/site",
    tag = "site",
    responses((status = 200, description = "Static site content", body = SiteContent))
)]
pub async fn content(State(state): State<AppState>) -> Json<SiteContent> {
    Json(SiteContent::from(&state.settings.site))
}
