use actix_web::{web, HttpResponse};

use crate::stats::snapshot::SnapshotReader;

/// Latest readings of the host, never waits for a new sample
pub async fn stats(snapshot: web::Data<SnapshotReader>) -> HttpResponse {
    HttpResponse::Ok().json(snapshot.read())
}
