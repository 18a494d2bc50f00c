//! Image command handlers.

use refuapp_core::Photo;
use serde::Serialize;

use crate::cli::{GlobalOpts, ImagesArgs, ImagesCommand};
use crate::error::{self, CliError};
use crate::output;

use super::{Context, util};

#[derive(Serialize)]
struct Uploaded {
    filename: String,
    url: String,
}

pub async fn handle(ctx: &Context, args: ImagesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ImagesCommand::Upload { path, format } => {
            let format = format
                .or_else(|| util::image_format(&path))
                .ok_or_else(|| CliError::Validation {
                    field: "format".into(),
                    reason: format!(
                        "cannot tell the image format of {}; pass --format",
                        path.display()
                    ),
                })?;
            let bytes = std::fs::read(&path)?;
            let photo = Photo::from_bytes(&bytes, format);

            let filename = ctx
                .registry
                .images()
                .upload(&photo)
                .await
                .map_err(|e| ctx.offline(e))?
                .into_result()
                .map_err(error::post_image)?;

            let uploaded = Uploaded {
                url: ctx.registry.images().url(&filename).to_string(),
                filename,
            };
            let out = output::render_single(
                &global.output,
                &uploaded,
                |u| format!("Stored as {}\n{}", u.filename, u.url),
                |u| u.filename.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
