use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{trim_in_place, trim_optional, Patch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    /// Free-form, usually a list of profile URLs.
    pub social_links: Option<String>,
    /// Display position. Not unique.
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn is_president(&self) -> bool {
        self.role.trim().eq_ignore_ascii_case("president")
    }
}

/// Up to two uppercase initials, used when there is no portrait.
pub fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Team as displayed: the president on their own, everyone else by `order`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRoster {
    pub president: Option<TeamMember>,
    pub members: Vec<TeamMember>,
}

impl TeamRoster {
    /// Sorts by `order` (stable, so ties keep stored order) and lifts out the
    /// first member whose role is "president" in any case.
    pub fn arrange(mut members: Vec<TeamMember>) -> Self {
        members.sort_by_key(|member| member.order);

        let president = members
            .iter()
            .position(TeamMember::is_president)
            .map(|idx| members.remove(idx));

        Self { president, members }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamMemberRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub social_links: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl CreateTeamMemberRequest {
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.role);
        trim_optional(&mut self.bio);
        trim_optional(&mut self.image);
        trim_optional(&mut self.social_links);
    }

    pub fn into_member(self) -> TeamMember {
        let now = Utc::now();
        TeamMember {
            id: Uuid::new_v4(),
            name: self.name,
            role: self.role,
            bio: self.bio,
            image: self.image,
            social_links: self.social_links,
            order: self.order,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&TeamMember> for CreateTeamMemberRequest {
    fn from(member: &TeamMember) -> Self {
        Self {
            name: member.name.clone(),
            role: member.role.clone(),
            bio: member.bio.clone(),
            image: member.image.clone(),
            social_links: member.social_links.clone(),
            order: member.order,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamMemberRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    #[schema(value_type = Option<String>)]
    pub bio: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    #[schema(value_type = Option<String>)]
    pub image: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    #[schema(value_type = Option<String>)]
    pub social_links: Patch<String>,
    pub order: Option<i32>,
}

impl UpdateTeamMemberRequest {
    pub fn apply(self, mut member: TeamMember) -> TeamMember {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(role) = self.role {
            member.role = role;
        }
        if let Some(order) = self.order {
            member.order = order;
        }
        self.bio.apply_to(&mut member.bio);
        self.image.apply_to(&mut member.image);
        self.social_links.apply_to(&mut member.social_links);

        trim_in_place(&mut member.name);
        trim_in_place(&mut member.role);
        trim_optional(&mut member.bio);
        trim_optional(&mut member.image);
        trim_optional(&mut member.social_links);
        member
    }
}
