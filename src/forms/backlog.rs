use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::backlog::{ItemKind, ItemStatus, NewBacklogItem, Priority, UpdateBacklogItem};
use crate::domain::types::{EpicId, ItemId, ItemTitle, MemberId, RichText, SprintId};

use super::{FormError, de_opt_i32, de_opt_u32};

#[derive(Deserialize, Validate)]
/// Form data for creating a backlog item.
pub struct AddItemForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: String,
    pub status: String,
    pub priority: String,
    #[serde(default, deserialize_with = "de_opt_u32")]
    #[validate(range(max = 100))]
    pub story_points: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    #[validate(range(max = 1000))]
    pub estimate_hours: Option<u32>,
    #[serde(default)]
    pub labels: String,
    #[serde(default, deserialize_with = "de_opt_i32")]
    pub assignee_id: Option<i32>,
    #[serde(default, deserialize_with = "de_opt_i32")]
    pub epic_id: Option<i32>,
    #[serde(default, deserialize_with = "de_opt_i32")]
    pub sprint_id: Option<i32>,
}

#[derive(Deserialize, Validate)]
/// Form data for updating an existing backlog item.
pub struct SaveItemForm {
    pub id: i32,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: String,
    pub status: String,
    pub priority: String,
    #[serde(default, deserialize_with = "de_opt_u32")]
    #[validate(range(max = 100))]
    pub story_points: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    #[validate(range(max = 1000))]
    pub estimate_hours: Option<u32>,
    #[serde(default)]
    pub labels: String,
    #[serde(default, deserialize_with = "de_opt_i32")]
    pub assignee_id: Option<i32>,
    #[serde(default, deserialize_with = "de_opt_i32")]
    pub epic_id: Option<i32>,
    #[serde(default, deserialize_with = "de_opt_i32")]
    pub sprint_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct DeleteItemForm {
    pub id: i32,
}

#[derive(MultipartForm)]
pub struct UploadItemsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl TryFrom<&AddItemForm> for NewBacklogItem {
    type Error = FormError;

    fn try_from(form: &AddItemForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            title: ItemTitle::new(&form.title).map_err(|_| FormError::InvalidName)?,
            description: RichText::new_opt(&form.description),
            kind: parse_kind(&form.kind)?,
            status: parse_status(&form.status)?,
            priority: parse_priority(&form.priority)?,
            story_points: form.story_points,
            estimate_hours: form.estimate_hours,
            labels: parse_labels(&form.labels),
            assignee_id: form
                .assignee_id
                .map(MemberId::new)
                .transpose()
                .map_err(|_| FormError::InvalidMemberId)?,
            epic_id: form
                .epic_id
                .map(EpicId::new)
                .transpose()
                .map_err(|_| FormError::InvalidEpicId)?,
            sprint_id: form
                .sprint_id
                .map(SprintId::new)
                .transpose()
                .map_err(|_| FormError::InvalidSprintId)?,
        })
    }
}

impl TryFrom<&SaveItemForm> for (ItemId, UpdateBacklogItem) {
    type Error = FormError;

    fn try_from(form: &SaveItemForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let id = ItemId::new(form.id).map_err(|_| FormError::InvalidItemId)?;
        let update = UpdateBacklogItem {
            title: ItemTitle::new(&form.title).map_err(|_| FormError::InvalidName)?,
            description: RichText::new_opt(&form.description),
            kind: parse_kind(&form.kind)?,
            status: parse_status(&form.status)?,
            priority: parse_priority(&form.priority)?,
            story_points: form.story_points,
            estimate_hours: form.estimate_hours,
            labels: parse_labels(&form.labels),
            assignee_id: form
                .assignee_id
                .map(MemberId::new)
                .transpose()
                .map_err(|_| FormError::InvalidMemberId)?,
            epic_id: form
                .epic_id
                .map(EpicId::new)
                .transpose()
                .map_err(|_| FormError::InvalidEpicId)?,
            sprint_id: form
                .sprint_id
                .map(SprintId::new)
                .transpose()
                .map_err(|_| FormError::InvalidSprintId)?,
        };
        Ok((id, update))
    }
}

impl UploadItemsForm {
    /// Parses the uploaded CSV file into backlog items.
    ///
    /// Recognized columns are `title`, `kind`, `status`, `priority`,
    /// `story_points`, `estimate_hours` and `labels`. Unknown columns are
    /// skipped, numeric cells that fail to parse are treated as empty.
    pub fn parse(&mut self) -> Result<Vec<NewBacklogItem>, FormError> {
        let file = self.csv.file.reopen()?;
        let mut reader = csv::Reader::from_reader(file);
        let headers = reader.headers()?.clone();

        let mut items = Vec::new();
        for result in reader.records() {
            let record = result?;

            let mut title = String::new();
            let mut kind = ItemKind::Story;
            let mut status = ItemStatus::Todo;
            let mut priority = Priority::Medium;
            let mut story_points = None;
            let mut estimate_hours = None;
            let mut labels = Vec::new();

            for (i, field) in record.iter().enumerate() {
                let field = field.trim();
                if field.is_empty() {
                    continue;
                }
                match headers.get(i) {
                    Some("title") => title = field.to_string(),
                    Some("kind") => kind = parse_kind(field)?,
                    Some("status") => status = parse_status(field)?,
                    Some("priority") => priority = parse_priority(field)?,
                    Some("story_points") => story_points = field.parse().ok(),
                    Some("estimate_hours") => estimate_hours = field.parse().ok(),
                    Some("labels") => labels = parse_labels(field),
                    _ => continue,
                }
            }

            items.push(NewBacklogItem {
                title: ItemTitle::new(title).map_err(|_| FormError::InvalidName)?,
                description: None,
                kind,
                status,
                priority,
                story_points,
                estimate_hours,
                labels,
                assignee_id: None,
                epic_id: None,
                sprint_id: None,
            });
        }

        Ok(items)
    }
}

fn parse_kind(raw: &str) -> Result<ItemKind, FormError> {
    raw.parse().map_err(|_| FormError::InvalidChoice("kind"))
}

fn parse_status(raw: &str) -> Result<ItemStatus, FormError> {
    raw.parse().map_err(|_| FormError::InvalidChoice("status"))
}

fn parse_priority(raw: &str) -> Result<Priority, FormError> {
    raw.parse().map_err(|_| FormError::InvalidChoice("priority"))
}

/// Splits a comma separated label cell, dropping blanks and duplicates.
pub(crate) fn parse_labels(raw: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in raw.split(',') {
        let label = label.trim();
        if label.is_empty() || labels.iter().any(|seen| seen == label) {
            continue;
        }
        labels.push(label.to_string());
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form() -> AddItemForm {
        AddItemForm {
            title: "Fix login redirect".to_string(),
            description: "<p>Loop on <b>Safari</b></p><script>x()</script>".to_string(),
            kind: "bug".to_string(),
            status: "in-progress".to_string(),
            priority: "High".to_string(),
            story_points: Some(3),
            estimate_hours: None,
            labels: "Bug, Auth, bug, ,Auth".to_string(),
            assignee_id: Some(2),
            epic_id: None,
            sprint_id: None,
        }
    }

    #[test]
    fn add_form_builds_a_new_item() {
        let payload = NewBacklogItem::try_from(&add_form()).unwrap();
        assert_eq!(payload.title.as_str(), "Fix login redirect");
        assert_eq!(payload.kind, ItemKind::Bug);
        assert_eq!(payload.status, ItemStatus::InProgress);
        assert_eq!(payload.priority, Priority::High);
        assert_eq!(payload.labels, vec!["Bug", "Auth", "bug"]);
        let description = payload.description.unwrap();
        assert!(!description.as_str().contains("script"));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut form = add_form();
        form.title = "  ".to_string();
        assert!(NewBacklogItem::try_from(&form).is_err());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut form = add_form();
        form.status = "paused".to_string();
        assert!(matches!(
            NewBacklogItem::try_from(&form),
            Err(FormError::InvalidChoice("status"))
        ));
    }

    #[test]
    fn oversized_story_points_fail_validation() {
        let mut form = add_form();
        form.story_points = Some(500);
        assert!(matches!(
            NewBacklogItem::try_from(&form),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn save_form_carries_the_item_id() {
        let form = SaveItemForm {
            id: 9,
            title: "Tune query planner".to_string(),
            description: String::new(),
            kind: "task".to_string(),
            status: "done".to_string(),
            priority: "medium".to_string(),
            story_points: None,
            estimate_hours: Some(6),
            labels: String::new(),
            assignee_id: None,
            epic_id: Some(1),
            sprint_id: Some(2),
        };
        let (id, update) = <(ItemId, UpdateBacklogItem)>::try_from(&form).unwrap();
        assert_eq!(id.get(), 9);
        assert_eq!(update.status, ItemStatus::Done);
        assert!(update.labels.is_empty());
    }
}
