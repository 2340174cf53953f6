//! Team member DTO ↔ entity conversions.

use super::{Translations, push_text};
use crate::api::dto::{TeamMemberRequest, TeamMemberResponse};
use crate::domain::entities::{NewTeamMember, NewTranslation, TeamMember, Translation, TranslationField};

/// Column values of a team member request. Blank optional strings are stored
/// as `NULL`.
pub fn to_new_team_member(request: &TeamMemberRequest) -> NewTeamMember {
    let non_blank = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    NewTeamMember {
        name: request.name.trim().to_string(),
        image: non_blank(&request.image),
        expertise: request.expertise.clone(),
        email: non_blank(&request.email),
        linkedin: non_blank(&request.linkedin),
        github: non_blank(&request.github),
        scholar: non_blank(&request.scholar),
    }
}

/// Role and bio rows for every language.
pub fn to_translations(request: &TeamMemberRequest) -> Vec<NewTranslation> {
    let mut out = Vec::with_capacity(6);
    push_text(&mut out, TranslationField::Role, &request.role);
    push_text(&mut out, TranslationField::Bio, &request.bio);
    out
}

pub fn to_response(member: TeamMember, translations: &[Translation]) -> TeamMemberResponse {
    let t = Translations::new(translations);

    TeamMemberResponse {
        id: member.id,
        name: member.name,
        role: t.text(TranslationField::Role),
        bio: t.text(TranslationField::Bio),
        image: member.image,
        expertise: member.expertise,
        email: member.email,
        linkedin: member.linkedin,
        github: member.github,
        scholar: member.scholar,
        created_at: member.created_at,
        updated_at: member.updated_at,
    }
}
