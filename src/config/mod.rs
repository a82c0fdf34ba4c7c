use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
    /// Directory holding a prebuilt front-end bundle. Unmatched paths are
    /// served from here when set.
    #[serde(default)]
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Argon2 PHC string. Takes precedence over `admin_password`.
    #[serde(default)]
    pub admin_password_hash: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
    pub session_duration_hours: i64,
    pub max_failed_attempts: u32,
    pub lockout_minutes: i64,
}

impl AuthConfig {
    pub fn has_admin_secret(&self) -> bool {
        self.admin_password_hash.as_deref().is_some_and(|h| !h.is_empty())
            || self.admin_password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Static marketing content shown on the home page.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    pub name: String,
    pub tagline: String,
    pub contact: ContactInfo,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub stats: Vec<StatCounter>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct SocialLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct StatCounter {
    pub value: u32,
    pub label: String,
    #[serde(default)]
    pub suffix: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Testimonial {
    pub name: String,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub initials: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // A missing .env is the normal case outside development
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.url", "sqlite://society.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.session_duration_hours", 12)?
            .set_default("auth.max_failed_attempts", 5)?
            .set_default("auth.lockout_minutes", 15)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with SOCIETY__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("SOCIETY").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
                static_dir: None,
            },
            database: DatabaseConfig {
                url: "sqlite://society.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                admin_password_hash: None,
                admin_password: None,
                session_duration_hours: 12,
                max_failed_attempts: 5,
                lockout_minutes: 15,
            },
            site: SiteConfig::default(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Computer Science Society".to_string(),
            tagline: "Learn, build and compete together".to_string(),
            contact: ContactInfo {
                email: "css@gcu.edu.pk".to_string(),
                phone: "+92 300 1234567".to_string(),
                location: "GCU Lahore, Punjab, Pakistan".to_string(),
            },
            social_links: vec![
                SocialLink {
                    label: "Facebook".to_string(),
                    href: "https://www.facebook.com/CSSGCU/".to_string(),
                },
                SocialLink {
                    label: "Instagram".to_string(),
                    href: "https://www.instagram.com/css.gcu/".to_string(),
                },
                SocialLink {
                    label: "LinkedIn".to_string(),
                    href: "https://www.linkedin.com/company/computer-science-society-gcu/".to_string(),
                },
            ],
            stats: vec![
                StatCounter { value: 500, label: "Active Members".to_string(), suffix: "+".to_string() },
                StatCounter { value: 50, label: "Events Organized".to_string(), suffix: "+".to_string() },
                StatCounter { value: 15, label: "Competitions Won".to_string(), suffix: String::new() },
                StatCounter { value: 100, label: "Projects Built".to_string(), suffix: "+".to_string() },
            ],
            testimonials: vec![
                Testimonial {
                    name: "Usman Ali".to_string(),
                    role: "CS Graduate 2024".to_string(),
                    content: "Being part of the society helped me develop leadership and teamwork alongside technical skills.".to_string(),
                    initials: None,
                },
                Testimonial {
                    name: "Ayesha Malik".to_string(),
                    role: "Current Member".to_string(),
                    content: "A great place to learn from industry experts and collaborate with talented peers.".to_string(),
                    initials: None,
                },
                Testimonial {
                    name: "Hassan Raza".to_string(),
                    role: "Alumni, Software Engineer".to_string(),
                    content: "The events gave me hands-on experience I couldn't get in the classroom.".to_string(),
                    initials: None,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_keeps_full_site_content() {
        let settings: Settings = Config::builder()
            .add_source(File::with_name("config/default"))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let site = settings.site;
        assert_eq!(site.contact.email, "css@gcu.edu.pk");

        let links: Vec<&str> = site.social_links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(links, ["Facebook", "Instagram", "LinkedIn"]);

        let stats: Vec<(u32, &str, &str)> = site
            .stats
            .iter()
            .map(|s| (s.value, s.label.as_str(), s.suffix.as_str()))
            .collect();
        assert_eq!(
            stats,
            [
                (500, "Active Members", "+"),
                (50, "Events Organized", "+"),
                (15, "Competitions Won", ""),
                (100, "Projects Built", "+"),
            ]
        );

        let authors: Vec<&str> = site.testimonials.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(authors, ["Usman Ali", "Ayesha Malik", "Hassan Raza"]);
    }
}
