use actix_multipart::Multipart;
use actix_web::{delete, get, post, web, HttpRequest};
use futures_util::TryStreamExt;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::file_upload::{
        model::FileResponse, repository_pg::FileRepositoryPg, service::FileUploadService,
    },
};

pub type FileSvc = FileUploadService<FileRepositoryPg>;

#[post("")]
pub async fn upload_file(
    file_service: web::Data<FileSvc>,
    mut payload: Multipart,
    req: HttpRequest,
) -> Result<success::Success<FileResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let max_size = file_service.max_file_size();

    while let Some(mut field) =
        payload.try_next().await.map_err(|_| error::Error::bad_request("Malformed multipart body"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
            .ok_or_else(|| error::Error::bad_request("Missing filename"))?;

        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) =
            field.try_next().await.map_err(|_| error::Error::bad_request("Malformed multipart body"))?
        {
            if bytes.len() + chunk.len() > max_size {
                return Err(error::Error::bad_request(format!(
                    "File size exceeds maximum allowed size of {max_size} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        let file = file_service.upload_file(user_id, filename, bytes, content_type).await?;
        return Ok(success::Success::created(Some(file)).message("File uploaded successfully"));
    }

    Err(error::Error::bad_request("No file found in request"))
}

#[get("/{id}")]
pub async fn get_file(
    file_service: web::Data<FileSvc>,
    id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<FileResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let file = file_service.get_file(id.into_inner(), user_id).await?;
    Ok(success::Success::ok(Some(file)).message("File retrieved successfully"))
}

#[delete("/{id}")]
pub async fn delete_file(
    file_service: web::Data<FileSvc>,
    id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    file_service.delete_file(id.into_inner(), user_id).await?;
    Ok(success::Success::no_content())
}
