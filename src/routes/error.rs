use rocket::serde::Serialize;
use rocket::serde::json::Json;
use rocket::{Request, catch};

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Error {
    pub error: String,
}

#[catch(401)]
pub fn unauthorized(_: &Request) -> Json<Error> {
    Json(Error {
        error: "Not authenticated".to_string(),
    })
}

#[catch(404)]
pub fn not_found(_: &Request) -> Json<Error> {
    Json(Error {
        error: "Not found".to_string(),
    })
}

#[catch(422)]
pub fn unprocessable_entity(_: &Request) -> Json<Error> {
    Json(Error {
        error: "Malformed request body".to_string(),
    })
}

#[catch(429)]
pub fn too_many_requests(_: &Request) -> Json<Error> {
    Json(Error {
        error: "Too many requests".to_string(),
    })
}

#[catch(500)]
pub fn internal_error(_: &Request) -> Json<Error> {
    Json(Error {
        error: "Internal server error".to_string(),
    })
}
