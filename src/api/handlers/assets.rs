// src/api/handlers/assets.rs
use actix_web::{HttpRequest, HttpResponse, Responder};
use rust_embed::RustEmbed;
use std::borrow::Cow;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

pub async fn static_file_handler(req: HttpRequest) -> impl Responder {
    let path = match req.path().trim_start_matches('/') {
        "" => "index.html",
        other => other,
    };

    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            HttpResponse::Ok().content_type(mime.as_ref()).body(Cow::into_owned(content.data))
        }
        None => HttpResponse::NotFound().body("404 Not Found"),
    }
}
