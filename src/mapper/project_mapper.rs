//! Project DTO ↔ entity conversions.

use serde_json::json;

use super::{Translations, push_list, push_text};
use crate::api::dto::{ProjectRequest, ProjectResponse};
use crate::domain::entities::{
    LanguageCode, NewProject, NewTranslation, Project, ProjectStatus, Translation, TranslationField,
};
use crate::error::AppError;

/// Column values of a project request.
pub fn to_new_project(request: &ProjectRequest) -> Result<NewProject, AppError> {
    let status: ProjectStatus = request
        .status
        .parse()
        .map_err(|e: String| AppError::bad_request(e, json!({ "status": request.status })))?;

    Ok(NewProject {
        slug: request.slug.clone(),
        image: request.image.clone(),
        tags: request.tags.clone(),
        status,
        start_date: request.start_date,
        end_date: request.end_date,
        team: request.team.clone(),
    })
}

/// Translation rows of a project request.
///
/// Title, descriptions and objectives are written for every language;
/// results only for the languages present in the request.
pub fn to_translations(request: &ProjectRequest) -> Result<Vec<NewTranslation>, AppError> {
    let mut out = Vec::with_capacity(15);

    push_text(&mut out, TranslationField::Title, &request.title);
    push_text(&mut out, TranslationField::ShortDescription, &request.short_description);
    push_text(&mut out, TranslationField::FullDescription, &request.full_description);

    for language in LanguageCode::ALL {
        push_list(
            &mut out,
            TranslationField::Objectives,
            language,
            request.objectives.get(language),
        )?;
    }

    if let Some(results) = &request.results {
        for language in LanguageCode::ALL {
            if let Some(items) = results.get(language) {
                push_list(&mut out, TranslationField::Results, language, items)?;
            }
        }
    }

    Ok(out)
}

/// Assembles the API representation from the entity and its translations.
pub fn to_response(project: Project, translations: &[Translation]) -> ProjectResponse {
    let t = Translations::new(translations);

    ProjectResponse {
        id: project.id,
        slug: project.slug,
        title: t.text(TranslationField::Title),
        short_description: t.text(TranslationField::ShortDescription),
        full_description: t.text(TranslationField::FullDescription),
        image: project.image,
        tags: project.tags,
        status: project.status.to_string(),
        start_date: project.start_date,
        end_date: project.end_date,
        team: project.team,
        objectives: t.list(TranslationField::Objectives),
        results: t.optional_list(TranslationField::Results),
        created_at: project.created_at,
        updated_at: project.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{LocalizedList, LocalizedText, OptionalLocalizedList};
    use crate::domain::entities::EntityType;
    use chrono::{NaiveDate, Utc};

    fn text(prefix: &str) -> LocalizedText {
        LocalizedText {
            en: format!("{prefix} en"),
            ru: format!("{prefix} ru"),
            kz: format!("{prefix} kz"),
        }
    }

    fn request() -> ProjectRequest {
        ProjectRequest {
            slug: "medical-imaging".into(),
            title: text("title"),
            short_description: text("short"),
            full_description: text("full"),
            image: Some("https://cdn.example/img.png".into()),
            tags: vec!["AI".into()],
            status: "upcoming".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            end_date: None,
            team: vec!["1".into(), "3".into()],
            objectives: LocalizedList {
                en: vec!["one".into()],
                ru: vec!["один".into()],
                kz: vec!["бір".into()],
            },
            results: Some(OptionalLocalizedList {
                en: Some(vec!["done".into()]),
                ru: None,
                kz: None,
            }),
        }
    }

    #[test]
    fn test_to_new_project() {
        let project = to_new_project(&request()).unwrap();
        assert_eq!(project.status, ProjectStatus::Upcoming);
        assert_eq!(project.team, vec!["1", "3"]);
    }

    #[test]
    fn test_to_translations_counts_and_encoding() {
        let rows = to_translations(&request()).unwrap();
        // 3 text fields x 3 languages + 3 objectives + 1 result
        assert_eq!(rows.len(), 13);

        let objective_en = rows
            .iter()
            .find(|r| r.field == TranslationField::Objectives && r.language == LanguageCode::En)
            .unwrap();
        assert_eq!(objective_en.value, r#"["one"]"#);

        let results: Vec<_> = rows
            .iter()
            .filter(|r| r.field == TranslationField::Results)
            .collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].language, LanguageCode::En);
    }

    #[test]
    fn test_to_response_reassembles_translations() {
        let req = request();
        let now = Utc::now();
        let project = Project {
            id: 7,
            slug: req.slug.clone(),
            image: req.image.clone(),
            tags: req.tags.clone(),
            status: ProjectStatus::Upcoming,
            start_date: req.start_date,
            end_date: None,
            team: req.team.clone(),
            created_at: now,
            updated_at: now,
        };
        let rows: Vec<Translation> = to_translations(&req)
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(i, t)| Translation {
                id: i as i64,
                entity_type: EntityType::Project,
                entity_id: 7,
                field: t.field,
                language: t.language,
                value: t.value,
            })
            .collect();

        let response = to_response(project, &rows);
        assert_eq!(response.id, 7);
        assert_eq!(response.title, req.title);
        assert_eq!(response.objectives, req.objectives);
        assert_eq!(response.results.en, Some(vec!["done".to_string()]));
        assert_eq!(response.results.ru, None);
        assert_eq!(response.status, "upcoming");
    }
}
