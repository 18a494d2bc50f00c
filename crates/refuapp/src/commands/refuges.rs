//! Refuge command handlers.

use std::fmt::Write as _;
use std::path::Path;
use std::pin::pin;

use chrono::Local;
use futures_util::StreamExt;
use refuapp_core::{
    Capacity, Coordinates, CreateRefuge, FeedEvent, GetAllRefugesResponse, Refuge, UpdateRefuge,
};
use tabled::Tabled;
use tokio::signal;

use crate::cli::{GlobalOpts, OutputFormat, RefugeFields, RefugesArgs, RefugesCommand};
use crate::error::{self, CliError};
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RefugeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Altitude")]
    altitude: String,
    #[tabled(rename = "Coordinates")]
    coordinates: String,
    #[tabled(rename = "Winter")]
    winter: u32,
    #[tabled(rename = "Summer")]
    summer: u32,
}

impl From<&Refuge> for RefugeRow {
    fn from(r: &Refuge) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            region: r.region.clone(),
            altitude: format!("{} m", r.altitude),
            coordinates: format_coordinates(r.coordinates),
            winter: r.capacity.winter,
            summer: r.capacity.summer,
        }
    }
}

fn format_coordinates(c: Coordinates) -> String {
    format!("{:.4}, {:.4}", c.latitude, c.longitude)
}

fn refuge_detail(r: &Refuge) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", r.id);
    let _ = writeln!(out, "Name:        {}", r.name);
    let _ = writeln!(out, "Region:      {}", r.region);
    let _ = writeln!(out, "Altitude:    {} m", r.altitude);
    let _ = writeln!(out, "Coordinates: {}", format_coordinates(r.coordinates));
    let _ = writeln!(
        out,
        "Capacity:    {} winter / {} summer",
        r.capacity.winter, r.capacity.summer
    );
    let _ = write!(out, "Image:       {}", r.image);
    out
}

fn print_refuge(refuge: &Refuge, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, refuge, refuge_detail, |r| {
        r.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_refuges(refuges: &[Refuge], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(&global.output, refuges, |r| RefugeRow::from(r), |r| {
        r.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Field assembly ──────────────────────────────────────────────────

fn required<T>(value: Option<T>, flag: &str) -> Result<T, CliError> {
    value.ok_or_else(|| CliError::Validation {
        field: flag.into(),
        reason: format!("--{flag} is required unless --from-file is given"),
    })
}

/// A new refuge from flags. Capacities default to zero and the image
/// to the placeholder.
fn create_from_fields(fields: RefugeFields) -> Result<CreateRefuge, CliError> {
    let mut refuge = CreateRefuge {
        name: required(fields.name, "name")?,
        region: required(fields.region, "region")?,
        altitude: required(fields.altitude, "altitude")?,
        coordinates: Coordinates {
            latitude: required(fields.latitude, "latitude")?,
            longitude: required(fields.longitude, "longitude")?,
        },
        capacity: Capacity {
            winter: fields.winter.unwrap_or_default(),
            summer: fields.summer.unwrap_or_default(),
        },
        ..CreateRefuge::default()
    };
    if let Some(image) = fields.image {
        refuge.image = image;
    }
    Ok(refuge)
}

/// Overlay the flags that were given onto existing values.
fn apply_fields(refuge: &mut CreateRefuge, fields: RefugeFields) {
    let RefugeFields {
        name,
        region,
        image,
        altitude,
        latitude,
        longitude,
        winter,
        summer,
    } = fields;

    if let Some(v) = name {
        refuge.name = v;
    }
    if let Some(v) = region {
        refuge.region = v;
    }
    if let Some(v) = image {
        refuge.image = v;
    }
    if let Some(v) = altitude {
        refuge.altitude = v;
    }
    if let Some(v) = latitude {
        refuge.coordinates.latitude = v;
    }
    if let Some(v) = longitude {
        refuge.coordinates.longitude = v;
    }
    if let Some(v) = winter {
        refuge.capacity.winter = v;
    }
    if let Some(v) = summer {
        refuge.capacity.summer = v;
    }
}

fn has_any_field(fields: &RefugeFields) -> bool {
    fields.name.is_some()
        || fields.region.is_some()
        || fields.image.is_some()
        || fields.altitude.is_some()
        || fields.latitude.is_some()
        || fields.longitude.is_some()
        || fields.winter.is_some()
        || fields.summer.is_some()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: RefugesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let refuges = ctx.registry.refuges();

    match args.command {
        RefugesCommand::List => {
            let all = refuges
                .get_all()
                .await
                .map_err(|e| ctx.offline(e))?
                .into_result()
                .map_err(error::list_refuges)?;
            print_refuges(&all, global)
        }

        RefugesCommand::Get { id } => {
            let refuge = fetch(ctx, &id).await?;
            print_refuge(&refuge, global)
        }

        RefugesCommand::Create { from_file, fields } => {
            let new = match from_file {
                Some(path) => util::read_json_file::<CreateRefuge>(&path)?,
                None => create_from_fields(fields)?,
            };
            let created = refuges
                .create(&new)
                .await
                .map_err(|e| ctx.offline(e))?
                .into_result()
                .map_err(|e| error::create_refuge(&new.name, e))?;
            if !global.quiet {
                eprintln!("Refuge '{}' created", created.name);
            }
            print_refuge(&created, global)
        }

        RefugesCommand::Update {
            id,
            from_file,
            fields,
        } => {
            let update = build_update(ctx, &id, from_file.as_deref(), fields).await?;
            let updated = refuges
                .update(&update)
                .await
                .map_err(|e| ctx.offline(e))?
                .into_result()
                .map_err(|e| error::update_refuge(&id, &update.changes.name, e))?;
            if !global.quiet {
                eprintln!("Refuge '{}' updated", updated.name);
            }
            print_refuge(&updated, global)
        }

        RefugesCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete refuge '{id}'? This cannot be undone."),
                global.yes,
                "refuges delete",
            )? {
                return Ok(());
            }
            let deleted = refuges
                .delete(&id)
                .await
                .map_err(|e| ctx.offline(e))?
                .into_result()
                .map_err(|e| error::delete_refuge(&id, e))?;
            if !global.quiet {
                eprintln!("Refuge '{}' deleted", deleted.name);
            }
            Ok(())
        }

        RefugesCommand::Watch => watch(ctx, global).await,

        RefugesCommand::ImageUrl { id } => {
            let refuge = fetch(ctx, &id).await?;
            output::print_output(refuges.image_url(&refuge).as_str(), global.quiet);
            Ok(())
        }
    }
}

async fn fetch(ctx: &Context, id: &str) -> Result<Refuge, CliError> {
    ctx.registry
        .refuges()
        .get(id)
        .await
        .map_err(|e| ctx.offline(e))?
        .into_result()
        .map_err(|e| error::get_refuge(id, e))
}

/// Whole replacement from a file, or the current record with the
/// given flags overlaid.
async fn build_update(
    ctx: &Context,
    id: &str,
    from_file: Option<&Path>,
    fields: RefugeFields,
) -> Result<UpdateRefuge, CliError> {
    if let Some(path) = from_file {
        let changes = util::read_json_file::<CreateRefuge>(path)?;
        return Ok(UpdateRefuge::new(id, changes));
    }
    if !has_any_field(&fields) {
        return Err(CliError::Validation {
            field: "update".into(),
            reason: "nothing to change; pass --from-file or at least one field flag".into(),
        });
    }

    let mut update = fetch(ctx, id).await?.to_update();
    apply_fields(&mut update.changes, fields);
    Ok(update)
}

// ── Watch ───────────────────────────────────────────────────────────

/// Print every change of the refuge list until Ctrl-C or the server
/// goes away.
async fn watch(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut events = pin!(ctx.registry.feed().subscribe().into_stream());

    loop {
        tokio::select! {
            biased;

            _ = signal::ctrl_c() => {
                ctx.registry.feed().stop();
                return Ok(());
            }

            event = events.next() => match event {
                Some(FeedEvent::Refuges(response)) => print_emission(&response, global, color)?,
                Some(FeedEvent::Aborted(reason)) => return Err(ctx.offline(reason)),
                None => return Ok(()),
            },
        }
    }
}

fn print_emission(
    response: &GetAllRefugesResponse,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            // The whole tagged result, so errors stay machine-readable.
            let out = output::render_single(&global.output, response, |_| String::new(), |_| {
                String::new()
            })?;
            output::print_output(&out, global.quiet);
        }
        OutputFormat::Table | OutputFormat::Plain => {
            if matches!(global.output, OutputFormat::Table) && !global.quiet {
                let stamp = Local::now().format("%H:%M:%S").to_string();
                eprintln!("{}", output::muted(&format!("── {stamp} ──"), color));
            }
            match response {
                GetAllRefugesResponse::Correct { data } => print_refuges(data, global)?,
                GetAllRefugesResponse::Error { error } => {
                    eprintln!("{} {error}", output::bad(error.code(), color));
                }
            }
        }
    }
    Ok(())
}
