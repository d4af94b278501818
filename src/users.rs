//! REST handlers for the user roster.
//!
//! The update and delete routines ([`update_user`], [`delete_user`]) take
//! an id and a [`Form`] rather than a [`Request`] so the HTML form pages in
//! [`forms`](crate::forms) can run exactly the same logic.

use std::sync::Arc;

use http::StatusCode;
use tracing::info;

use crate::envelope::Envelope;
use crate::error::Error;
use crate::request::{Form, Request};
use crate::store::{NewUser, UserField, UserPatch, UserStore};
use crate::validation::{non_blank, parse_age, required_text};

const NO_SUCH_USER: &str = "There is no user associated with this id!";
const CREATE_MISSING: &str = "Cannot create new user because user name, age and/or team are missing";
const CREATE_BAD_AGE: &str = "Cannot create new user because age is not a number";
const UPDATE_BAD_AGE: &str = "Cannot update user because age is not a number";

/// `GET /`
pub async fn hello(_req: Request, _store: Arc<UserStore>) -> Result<Envelope, Error> {
    Envelope::data(StatusCode::OK, "content", "hello world!", "")
}

/// `GET /mirror/{name}`
pub async fn mirror(req: Request, _store: Arc<UserStore>) -> Result<Envelope, Error> {
    let name = req.param("name").unwrap_or_default();
    Envelope::data(StatusCode::OK, "name", name, "")
}

/// `GET /users`, optionally filtered with `?team=`.
pub async fn list(req: Request, store: Arc<UserStore>) -> Result<Envelope, Error> {
    let query = req.query()?;
    match query.get("team").filter(|team| !team.is_empty()) {
        Some(team) => Envelope::data(
            StatusCode::OK,
            "users",
            store.filter_by(UserField::Team, team),
            format!("Users filtered by {} {team}", UserField::Team),
        ),
        None => Envelope::data(StatusCode::OK, "users", store.all(), ""),
    }
}

/// `POST /users`
pub async fn create(req: Request, store: Arc<UserStore>) -> Result<Envelope, Error> {
    create_user(&store, &req.form()?)
}

/// `GET /users/{id}`
pub async fn show(req: Request, store: Arc<UserStore>) -> Result<Envelope, Error> {
    match path_id(&req).and_then(|id| store.get(id)) {
        Some(user) => Envelope::data(StatusCode::OK, "user", user, ""),
        None => Ok(not_found()),
    }
}

/// `PUT /users/{id}`
pub async fn update(req: Request, store: Arc<UserStore>) -> Result<Envelope, Error> {
    update_user(&store, req.param("id").unwrap_or_default(), &req.form()?)
}

/// `DELETE /users/{id}`
pub async fn delete(req: Request, store: Arc<UserStore>) -> Result<Envelope, Error> {
    Ok(delete_user(&store, req.param("id").unwrap_or_default()))
}

/// Validates `form` and inserts a new user.
///
/// Presence of all three fields is checked before the age is parsed, so a
/// missing team wins over a malformed age.
pub fn create_user(store: &UserStore, form: &Form) -> Result<Envelope, Error> {
    let (Ok(name), Some(age), Ok(team)) = (
        required_text("name", form.get("name")),
        form.get("age"),
        required_text("team", form.get("team")),
    ) else {
        return Ok(Envelope::plain(StatusCode::UNPROCESSABLE_ENTITY, CREATE_MISSING));
    };
    let Ok(age) = parse_age(age) else {
        return Ok(Envelope::plain(StatusCode::UNPROCESSABLE_ENTITY, CREATE_BAD_AGE));
    };

    let user = store.create(NewUser { name: name.to_owned(), age, team: team.to_owned() });
    info!(id = user.id, "user created");
    let message = format!("user with id {} has successfully been created", user.id);
    Envelope::data(StatusCode::CREATED, "new user", user, message)
}

/// Applies the submitted fields to user `raw_id`, one store call per field.
///
/// Fields are processed in the order name, age, team. Absent or blank
/// fields are skipped. A malformed age answers 422 straight away: a name
/// applied before it stays, the team is not looked at.
pub fn update_user(store: &UserStore, raw_id: &str, form: &Form) -> Result<Envelope, Error> {
    let Some(id) = parse_id(raw_id).filter(|id| store.get(*id).is_some()) else {
        return Ok(not_found());
    };

    if let Some(name) = non_blank(form.get("name")) {
        store.update(id, UserPatch::name(name));
    }
    if let Some(age) = non_blank(form.get("age")) {
        match parse_age(age) {
            Ok(age) => {
                store.update(id, UserPatch::age(age));
            }
            Err(_) => return Ok(Envelope::plain(StatusCode::UNPROCESSABLE_ENTITY, UPDATE_BAD_AGE)),
        }
    }
    if let Some(team) = non_blank(form.get("team")) {
        store.update(id, UserPatch::team(team));
    }

    // A concurrent delete between the calls above leaves nothing to show.
    let Some(user) = store.get(id) else {
        return Ok(not_found());
    };
    info!(id, "user updated");
    Envelope::data(
        StatusCode::OK,
        "user",
        user,
        format!("user with id {id} has successfully been updated"),
    )
}

/// Removes user `raw_id`.
pub fn delete_user(store: &UserStore, raw_id: &str) -> Envelope {
    match parse_id(raw_id) {
        Some(id) if store.delete(id) => {
            info!(id, "user deleted");
            Envelope::plain(StatusCode::OK, format!("user with id {id} has successfully been deleted"))
        }
        _ => not_found(),
    }
}

fn path_id(req: &Request) -> Option<u64> {
    req.param("id").and_then(parse_id)
}

/// Ids that do not parse name no user.
fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

fn not_found() -> Envelope {
    Envelope::plain(StatusCode::NOT_FOUND, NO_SUCH_USER)
}
