use tracing::info;
use uuid::Uuid;

use crate::{
    db::Repositories,
    error::{AppError, AppResult},
    models::{
        child::{Child, ChildFields, ChildRequest, ChildWithStaff},
        user::UserRole,
        Gender,
    },
    services::{normalize_email, optional_text, parse_enum, require, require_text},
};

pub struct ChildService;

impl ChildService {
    pub async fn list(repos: &Repositories) -> AppResult<Vec<Child>> {
        Ok(repos.children.list().await?)
    }

    pub async fn get(repos: &Repositories, id: Uuid) -> AppResult<Child> {
        repos
            .children
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Child not found"))
    }

    pub async fn create(repos: &Repositories, req: ChildRequest) -> AppResult<Child> {
        let fields = merge(req, None)?;
        Self::check_references(repos, &fields).await?;
        let child = repos.children.create(&fields).await?;
        info!(child_id = %child.id, "Child registered");
        Ok(child)
    }

    /// Apply the supplied fields on top of the stored record.
    pub async fn update(repos: &Repositories, id: Uuid, req: ChildRequest) -> AppResult<Child> {
        let existing = Self::get(repos, id).await?;
        let fields = merge(req, Some(fields_of(&existing)))?;
        Self::check_references(repos, &fields).await?;
        repos
            .children
            .update(id, &fields)
            .await?
            .ok_or_else(|| AppError::not_found("Child not found"))
    }

    /// Removes the child together with its attendance, activities and fees.
    pub async fn delete(repos: &Repositories, id: Uuid) -> AppResult<()> {
        if !repos.children.delete(id).await? {
            return Err(AppError::not_found("Child not found"));
        }
        info!(child_id = %id, "Child removed");
        Ok(())
    }

    /// The child linked to this parent, with its assigned staff resolved.
    pub async fn for_parent(repos: &Repositories, parent_id: Uuid) -> AppResult<Option<ChildWithStaff>> {
        let Some(child) = repos.children.find_for_parent(parent_id).await? else {
            return Ok(None);
        };
        let ids: Vec<Uuid> = [child.assigned_teacher, child.assigned_caretaker]
            .into_iter()
            .flatten()
            .collect();
        let staff = repos.staff.find_by_ids(&ids).await?;
        let pick = |id: Option<Uuid>| id.and_then(|id| staff.iter().find(|p| p.id == id).cloned());
        Ok(Some(ChildWithStaff {
            teacher: pick(child.assigned_teacher),
            caretaker: pick(child.assigned_caretaker),
            child,
        }))
    }

    async fn check_references(repos: &Repositories, fields: &ChildFields) -> AppResult<()> {
        for (id, label) in [
            (fields.assigned_teacher, "Assigned teacher"),
            (fields.assigned_caretaker, "Assigned caretaker"),
        ] {
            if let Some(id) = id {
                if repos.staff.find_by_id(id).await?.is_none() {
                    return Err(AppError::invalid(format!("{label} not found")));
                }
            }
        }
        if let Some(parent_id) = fields.parent_id {
            match repos.users.find_by_id(parent_id).await? {
                Some(u) if u.role == UserRole::Parent => {}
                _ => return Err(AppError::invalid("Parent account not found")),
            }
        }
        Ok(())
    }
}

fn fields_of(c: &Child) -> ChildFields {
    ChildFields {
        child_name: c.child_name.clone(),
        dob: c.dob,
        gender: c.gender,
        blood_group: c.blood_group.clone(),
        admission_date: c.admission_date,
        parent_name: c.parent_name.clone(),
        parent_email: c.parent_email.clone(),
        parent_phone: c.parent_phone.clone(),
        emergency_contact_name: c.emergency_contact_name.clone(),
        emergency_contact_number: c.emergency_contact_number.clone(),
        allergies: c.allergies.clone(),
        medical_conditions: c.medical_conditions.clone(),
        assigned_teacher: c.assigned_teacher,
        assigned_caretaker: c.assigned_caretaker,
        parent_id: c.parent_id,
    }
}

/// Overlay a request on `base`. Without a base every mandatory field must be present.
fn merge(req: ChildRequest, base: Option<ChildFields>) -> AppResult<ChildFields> {
    let text = |new: Option<String>, old: Option<&String>, field: &str| {
        require_text(new.or_else(|| old.cloned()), field)
    };
    let b = base.as_ref();

    let gender = match req.gender {
        Some(g) => parse_enum::<Gender>(g.trim())?,
        None => require(b.map(|b| b.gender), "Gender")?,
    };
    let admission_date = require(req.admission_date.or(b.map(|b| b.admission_date)), "Admission date")?;

    Ok(ChildFields {
        child_name: text(req.child_name, b.map(|b| &b.child_name), "Child name")?,
        dob: require(req.dob.or(b.map(|b| b.dob)), "Date of birth")?,
        gender,
        blood_group: text(req.blood_group, b.map(|b| &b.blood_group), "Blood group")?,
        admission_date,
        parent_name: text(req.parent_name, b.map(|b| &b.parent_name), "Parent name")?,
        parent_email: normalize_email(&text(req.parent_email, b.map(|b| &b.parent_email), "Parent email")?),
        parent_phone: text(req.parent_phone, b.map(|b| &b.parent_phone), "Parent phone")?,
        emergency_contact_name: text(
            req.emergency_contact_name,
            b.map(|b| &b.emergency_contact_name),
            "Emergency contact name",
        )?,
        emergency_contact_number: text(
            req.emergency_contact_number,
            b.map(|b| &b.emergency_contact_number),
            "Emergency contact number",
        )?,
        allergies: match req.allergies {
            Some(a) => optional_text(Some(a)),
            None => b.and_then(|b| b.allergies.clone()),
        },
        medical_conditions: match req.medical_conditions {
            Some(m) => optional_text(Some(m)),
            None => b.and_then(|b| b.medical_conditions.clone()),
        },
        assigned_teacher: req.assigned_teacher.or(b.and_then(|b| b.assigned_teacher)),
        assigned_caretaker: req.assigned_caretaker.or(b.and_then(|b| b.assigned_caretaker)),
        parent_id: req.parent.or(b.and_then(|b| b.parent_id)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::user::AccountStatus,
        test_support::{child_request, TestApp},
    };

    #[tokio::test]
    async fn create_requires_mandatory_fields() {
        let app = TestApp::new();
        let mut req = child_request("Milo");
        req.blood_group = None;
        let err = ChildService::create(&app.state.repos, req).await.unwrap_err();
        assert_eq!(err.to_string(), "Blood group is required");

        let mut req = child_request("Milo");
        req.gender = Some("male".into());
        assert!(matches!(
            ChildService::create(&app.state.repos, req).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn update_is_partial() {
        let app = TestApp::new();
        let child = ChildService::create(&app.state.repos, child_request("Milo")).await.unwrap();
        let (_, teacher) = app.staff_member("Ada", "ada@example.com").await;

        let update = ChildRequest {
            allergies: Some("Peanuts".into()),
            assigned_teacher: Some(teacher.id),
            ..Default::default()
        };
        let updated = ChildService::update(&app.state.repos, child.id, update).await.unwrap();
        assert_eq!(updated.child_name, "Milo");
        assert_eq!(updated.allergies.as_deref(), Some("Peanuts"));
        assert_eq!(updated.assigned_teacher, Some(teacher.id));
        assert_eq!(updated.dob, child.dob);
    }

    #[tokio::test]
    async fn unknown_references_are_rejected() {
        let app = TestApp::new();
        let staff = app
            .user("Ada", "ada@example.com", UserRole::Staff, AccountStatus::Active)
            .await;

        let mut req = child_request("Milo");
        req.assigned_caretaker = Some(Uuid::new_v4());
        assert!(ChildService::create(&app.state.repos, req).await.is_err());

        let mut req = child_request("Milo");
        req.parent = Some(staff.id);
        let err = ChildService::create(&app.state.repos, req).await.unwrap_err();
        assert_eq!(err.to_string(), "Parent account not found");
    }

    #[tokio::test]
    async fn parent_view_resolves_assigned_staff() {
        let app = TestApp::new();
        let parent = app
            .user("Pat", "pat@example.com", UserRole::Parent, AccountStatus::Active)
            .await;
        let (_, teacher) = app.staff_member("Ada", "ada@example.com").await;
        app.child("Milo", Some(teacher.id), None, Some(parent.id)).await;

        let view = ChildService::for_parent(&app.state.repos, parent.id).await.unwrap().unwrap();
        assert_eq!(view.child.child_name, "Milo");
        assert_eq!(view.teacher.map(|t| t.id), Some(teacher.id));
        assert!(view.caretaker.is_none());

        assert!(ChildService::for_parent(&app.state.repos, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_missing_child() {
        let app = TestApp::new();
        let child = app.child("Milo", None, None, None).await;
        ChildService::delete(&app.state.repos, child.id).await.unwrap();
        assert!(matches!(
            ChildService::delete(&app.state.repos, child.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
