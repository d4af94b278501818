//! HTML form pages for browsers.
//!
//! HTML forms can only `GET` and `POST`, so updating and deleting go through
//! `POST /users/update_user` and `POST /users/delete_user`. Those handlers
//! call the same routines as `PUT` and `DELETE /users/{id}` and relay the
//! envelope they produce unchanged.
//!
//! The pages are static documents compiled into the binary.

use std::sync::Arc;

use http::StatusCode;

use crate::envelope::Envelope;
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::store::UserStore;
use crate::users;
use crate::validation::non_blank;

/// A form page.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Page {
    CreateUser,
    UpdateUser,
    DeleteUser,
}

impl Page {
    fn source(self) -> &'static str {
        match self {
            Self::CreateUser => include_str!("../templates/create_user.html"),
            Self::UpdateUser => include_str!("../templates/update_user.html"),
            Self::DeleteUser => include_str!("../templates/delete_user.html"),
        }
    }
}

/// Renders `page` as an HTML response.
pub fn render(page: Page) -> Response {
    Response::html(page.source())
}

/// `GET /users/create_user`. The form posts straight to `POST /users`.
pub async fn create_page(_req: Request, _store: Arc<UserStore>) -> Response {
    render(Page::CreateUser)
}

/// `GET /users/update_user`
pub async fn update_page(_req: Request, _store: Arc<UserStore>) -> Response {
    render(Page::UpdateUser)
}

/// `GET /users/delete_user`
pub async fn delete_page(_req: Request, _store: Arc<UserStore>) -> Response {
    render(Page::DeleteUser)
}

/// `POST /users/update_user`
pub async fn submit_update(req: Request, store: Arc<UserStore>) -> Result<Envelope, Error> {
    let form = req.form()?;
    let Some(id) = non_blank(form.get("id")) else {
        return Ok(Envelope::plain(StatusCode::NOT_FOUND, "can't update user with blank id!"));
    };
    users::update_user(&store, id, &form)
}

/// `POST /users/delete_user`
pub async fn submit_delete(req: Request, store: Arc<UserStore>) -> Result<Envelope, Error> {
    let form = req.form()?;
    let Some(id) = non_blank(form.get("id")) else {
        return Ok(Envelope::plain(StatusCode::NOT_FOUND, "can't delete user with blank id!"));
    };
    Ok(users::delete_user(&store, id))
}
