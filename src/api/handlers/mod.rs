pub mod admin;
pub mod announcements;
pub mod contact;
pub mod events;
pub mod registrations;
pub mod root;
pub mod site;
pub mod team_members;
