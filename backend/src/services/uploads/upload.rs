use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{web, HttpResponse, Responder};
use common::requests::StatusReply;
use common::upload::{
    validate_media_type, UploadKind, UploadSlot, FILE_FIELD, TARGET_FIELD, TYPE_FIELD,
};
use common::BandError;
use futures_util::StreamExt;
use log::{error, info, warn};
use md5::Context;
use thiserror::Error;

use crate::config::Settings;
use crate::services::error_response;
use crate::services::uploads::PUBLIC_PREFIX;
use crate::store::{BandStore, StoreError};

/// Bytes kept from the start of the file for format sniffing.
const SNIFF_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("could not store the upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("upload exceeds the limit of {0} bytes")]
    TooLarge(usize),
}

impl From<BandError> for UploadError {
    fn from(err: BandError) -> Self {
        UploadError::Store(err.into())
    }
}

pub async fn process(
    store: web::Data<BandStore>,
    settings: web::Data<Settings>,
    payload: Multipart,
) -> impl Responder {
    match upload_image(&store, &settings, payload).await {
        Ok(path) => HttpResponse::Ok().json(StatusReply::ok_with_path(path)),
        Err(UploadError::Store(err)) => error_response(&err),
        Err(UploadError::Io(err)) => {
            error!("Upload could not be written: {err}");
            HttpResponse::ServiceUnavailable()
                .json(StatusReply::failure(format!("could not store the upload: {err}")))
        }
        Err(err) => {
            warn!("Rejected upload: {err}");
            HttpResponse::BadRequest().json(StatusReply::failure(err.to_string()))
        }
    }
}

/// A received file, still under its temporary name.
struct Received {
    temp_path: PathBuf,
    digest: String,
    head: Vec<u8>,
}

/// Fields read from the multipart body so far.
#[derive(Default)]
struct UploadFields {
    declared_kind: Option<UploadKind>,
    slot: Option<UploadSlot>,
    received: Option<Received>,
}

impl UploadFields {
    /// Removes the temporary file of a body that was rejected part way.
    fn discard_received(&mut self) {
        if let Some(received) = self.received.take() {
            discard(&received.temp_path);
        }
    }
}

/// Reads the multipart body, stores the image and binds it to its slot.
/// Returns the public path of the stored file.
pub async fn upload_image(
    store: &BandStore,
    settings: &Settings,
    mut payload: Multipart,
) -> Result<String, UploadError> {
    let mut fields = UploadFields::default();
    if let Err(err) = read_fields(&mut payload, settings, &mut fields).await {
        fields.discard_received();
        return Err(err);
    }
    let UploadFields {
        declared_kind,
        slot,
        received,
    } = fields;

    let slot = slot.ok_or_else(|| BandError::validation("missing upload target"))?;
    let received = received.ok_or_else(|| BandError::validation("missing file"))?;
    if let Some(kind) = declared_kind {
        if kind != slot.kind() {
            discard(&received.temp_path);
            return Err(BandError::validation(format!(
                "upload type '{}' does not match target '{}'",
                kind.as_str(),
                slot
            ))
            .into());
        }
    }

    let file_name = finish(received, &settings.upload_dir)?;
    let public_path = format!("{PUBLIC_PREFIX}/{file_name}");
    store.set_image(&slot, &public_path)?;

    info!("Upload for {} stored at {}", slot, public_path);
    Ok(public_path)
}

async fn read_fields(
    payload: &mut Multipart,
    settings: &Settings,
    fields: &mut UploadFields,
) -> Result<(), UploadError> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match name.as_deref() {
            Some(TYPE_FIELD) => {
                fields.declared_kind = Some(read_text(&mut field).await?.trim().parse()?);
            }
            Some(TARGET_FIELD) => {
                fields.slot = Some(read_text(&mut field).await?.trim().parse()?);
            }
            Some(FILE_FIELD) => {
                if fields.slot.is_none() {
                    return Err(
                        BandError::validation("the upload target must precede the file").into(),
                    );
                }
                let media_type = field
                    .content_type()
                    .map(|mime| mime.essence_str().to_string())
                    .unwrap_or_default();
                validate_media_type(&media_type)?;
                fields.discard_received();
                fields.received = Some(receive_file(&mut field, settings).await?);
            }
            _ => {}
        }
    }
    Ok(())
}

async fn read_text(field: &mut Field) -> Result<String, UploadError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    String::from_utf8(bytes)
        .map_err(|_| BandError::validation("form fields must be valid UTF-8").into())
}

/// Streams the file into a temporary name, hashing it on the way.
async fn receive_file(field: &mut Field, settings: &Settings) -> Result<Received, UploadError> {
    fs::create_dir_all(&settings.upload_dir)?;
    let temp_path = settings
        .upload_dir
        .join(format!("{}.part", uuid::Uuid::new_v4()));
    let mut writer = BufWriter::new(File::create(&temp_path)?);
    let mut hasher = Context::new();
    let mut head = Vec::with_capacity(SNIFF_LEN);
    let mut size = 0usize;

    while let Some(chunk) = field.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                discard(&temp_path);
                return Err(err.into());
            }
        };
        size += chunk.len();
        if size > settings.max_upload_bytes {
            discard(&temp_path);
            return Err(UploadError::TooLarge(settings.max_upload_bytes));
        }
        if head.len() < SNIFF_LEN {
            let take = (SNIFF_LEN - head.len()).min(chunk.len());
            head.extend_from_slice(&chunk[..take]);
        }
        hasher.consume(&chunk);
        if let Err(err) = writer.write_all(&chunk) {
            discard(&temp_path);
            return Err(err.into());
        }
    }
    if let Err(err) = writer.flush() {
        discard(&temp_path);
        return Err(err.into());
    }

    Ok(Received {
        temp_path,
        digest: format!("{:x}", hasher.finalize()),
        head,
    })
}

/// Sniffs the content and moves the file to its content-addressed name.
fn finish(received: Received, upload_dir: &Path) -> Result<String, UploadError> {
    let format = match image::guess_format(&received.head) {
        Ok(format) => format,
        Err(_) => {
            discard(&received.temp_path);
            return Err(
                BandError::InvalidFileType("the file content is not an image".into()).into(),
            );
        }
    };
    let extension = format.extensions_str().first().copied().unwrap_or("img");
    let file_name = format!("{}.{}", received.digest, extension);
    let final_path = upload_dir.join(&file_name);

    if final_path.exists() {
        discard(&received.temp_path);
    } else if let Err(err) = fs::rename(&received.temp_path, &final_path) {
        discard(&received.temp_path);
        return Err(err.into());
    }
    Ok(file_name)
}

fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        warn!("Could not remove temporary upload {}: {}", path.display(), err);
    }
}
