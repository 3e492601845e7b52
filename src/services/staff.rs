use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::Repositories,
    error::{AppError, AppResult},
    models::{
        auth::AuthenticatedUser,
        child::Child,
        staff::{ProfileStatus, StaffProfile, StaffProfileFields, StaffProfileRequest, StaffTitle},
        user::UserRole,
        Gender,
    },
    services::{authorizer::resolve_staff_profile, normalize_email, parse_enum, require, require_text},
};

pub struct StaffService;

impl StaffService {
    /// Admin creation. Links the profile to an existing staff identity with the same email.
    pub async fn create(repos: &Repositories, req: StaffProfileRequest) -> AppResult<StaffProfile> {
        let mut fields = merge(req, None)?;
        let identity = repos
            .users
            .find_by_email(&fields.inner.email)
            .await?
            .filter(|u| u.role == UserRole::Staff);
        if let Some(user) = &identity {
            if repos.staff.find_by_user_id(user.id).await?.is_some() {
                return Err(AppError::EmailAlreadyExists);
            }
        }

        let status_given = fields.status_given;
        if let (Some(user), false) = (&identity, status_given) {
            fields.inner.status = ProfileStatus::from(user.status);
        }
        let profile = repos
            .staff
            .create(&fields.inner, identity.map(|u| u.id))
            .await?
            .ok_or(AppError::EmailAlreadyExists)?;
        info!(staff_id = %profile.id, linked = profile.user_id.is_some(), "Staff profile created");
        Ok(profile)
    }

    pub async fn list_active(repos: &Repositories) -> AppResult<Vec<StaffProfile>> {
        Ok(repos.staff.list(Some(ProfileStatus::Active)).await?)
    }

    pub async fn get(repos: &Repositories, id: Uuid) -> AppResult<StaffProfile> {
        repos
            .staff
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Staff member not found"))
    }

    pub async fn update(repos: &Repositories, id: Uuid, req: StaffProfileRequest) -> AppResult<StaffProfile> {
        let existing = Self::get(repos, id).await?;
        let fields = merge(req, Some(&existing))?.inner;
        ensure_email_free(repos, &fields.email, existing.id).await?;
        repos
            .staff
            .update(id, &fields)
            .await?
            .ok_or_else(|| AppError::not_found("Staff member not found"))
    }

    pub async fn delete(repos: &Repositories, id: Uuid) -> AppResult<()> {
        if !repos.staff.delete(id).await? {
            return Err(AppError::not_found("Staff member not found"));
        }
        info!(staff_id = %id, "Staff profile removed");
        Ok(())
    }

    pub async fn assigned_children(repos: &Repositories, profile: &StaffProfile) -> AppResult<Vec<Child>> {
        Ok(repos.children.list_assigned_to(profile.id).await?)
    }

    pub async fn own_profile(repos: &Repositories, user: &AuthenticatedUser) -> AppResult<StaffProfile> {
        resolve_staff_profile(repos, user).await
    }

    /// Create or edit the requester's own profile. The email always mirrors the
    /// identity and the status is never taken from the request.
    pub async fn upsert_own(
        repos: &Repositories,
        user: &AuthenticatedUser,
        mut req: StaffProfileRequest,
    ) -> AppResult<StaffProfile> {
        let Some(user_id) = user.principal.user_id() else {
            return Err(AppError::forbidden("The bootstrap administrator has no staff profile"));
        };
        let identity = repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        req.email = Some(identity.email.clone());
        req.status = None;

        let existing = repos.staff.find_by_user_id(user_id).await?;
        let profile = match existing {
            Some(current) => {
                let mut fields = merge(req, Some(&current))?.inner;
                fields.status = current.status;
                ensure_email_free(repos, &fields.email, current.id).await?;
                repos
                    .staff
                    .update(current.id, &fields)
                    .await?
                    .ok_or(AppError::StaffProfileNotFound)?
            }
            None => {
                // An unlinked profile under this email is adopted as the base.
                let orphan = repos
                    .staff
                    .find_by_email(&identity.email)
                    .await?
                    .filter(|p| p.user_id.is_none());
                let mut fields = merge(req, orphan.as_ref())?.inner;
                fields.status = orphan
                    .as_ref()
                    .map_or(ProfileStatus::from(identity.status), |p| p.status);
                repos
                    .staff
                    .upsert_for_user(user_id, &fields)
                    .await?
                    .ok_or(AppError::EmailAlreadyExists)?
            }
        };
        info!(staff_id = %profile.id, user_id = %user_id, "Staff profile saved by owner");
        Ok(profile)
    }
}

async fn ensure_email_free(repos: &Repositories, email: &str, owner: Uuid) -> AppResult<()> {
    match repos.staff.find_by_email(email).await? {
        Some(other) if other.id != owner => Err(AppError::EmailAlreadyExists),
        _ => Ok(()),
    }
}

struct Merged {
    inner: StaffProfileFields,
    status_given: bool,
}

fn merge(req: StaffProfileRequest, base: Option<&StaffProfile>) -> AppResult<Merged> {
    let text = |new: Option<String>, old: Option<&String>, field: &str| {
        require_text(new.or_else(|| old.cloned()), field)
    };

    let email = normalize_email(&text(req.email, base.map(|b| &b.email), "Email")?);
    if !email.contains('@') {
        return Err(AppError::invalid("Please provide a valid email"));
    }
    let title = match req.role {
        Some(r) => parse_enum::<StaffTitle>(r.trim())?,
        None => require(base.map(|b| b.title), "Role")?,
    };
    let gender = match req.gender {
        Some(g) => parse_enum::<Gender>(g.trim())?,
        None => require(base.map(|b| b.gender), "Gender")?,
    };
    let status_given = req.status.is_some();
    let status = match req.status {
        Some(s) => parse_enum::<ProfileStatus>(s.trim())?,
        None => base.map_or(ProfileStatus::Pending, |b| b.status),
    };

    Ok(Merged {
        inner: StaffProfileFields {
            name: text(req.name, base.map(|b| &b.name), "Name")?,
            email,
            phone: text(req.phone, base.map(|b| &b.phone), "Phone")?,
            title,
            dob: require(req.dob.or(base.map(|b| b.dob)), "Date of birth")?,
            gender,
            joining_date: req
                .joining_date
                .or(base.map(|b| b.joining_date))
                .unwrap_or_else(|| Utc::now().date_naive()),
            qualification: text(req.qualification, base.map(|b| &b.qualification), "Qualification")?,
            experience: text(req.experience, base.map(|b| &b.experience), "Experience")?,
            address: text(req.address, base.map(|b| &b.address), "Address")?,
            status,
        },
        status_given,
    })
}
