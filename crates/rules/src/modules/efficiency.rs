//! Image efficiency checks: file size per resolution and resolution per display size.

use caretaker_core::types::{Category, Level, Message, Remediation};
use caretaker_tree::content::{Content, ContentFile};
use caretaker_tree::path;

use crate::error::RuleError;
use crate::module::{AnalysisContext, Finding, RuleModule};

/// Upper bound in bytes for images whose pixel count reaches each breakpoint.
/// The final `None` row is the wildcard used when the resolution is unknown.
type SizeTable = [(Option<u64>, u64); 5];

const PNG: SizeTable = [
    (Some(0), 51_200),
    (Some(10_000), 153_600),
    (Some(307_200), 307_200),
    (Some(2_073_600), 512_000),
    (None, 512_000),
];

const JPEG: SizeTable = [
    (Some(0), 25_600),
    (Some(10_000), 102_400),
    (Some(307_200), 204_800),
    (Some(2_073_600), 409_600),
    (None, 409_600),
];

const GIF: SizeTable = [
    (Some(0), 51_200),
    (Some(10_000), 153_600),
    (Some(307_200), 512_000),
    (Some(2_073_600), 1_048_576),
    (None, 1_048_576),
];

/// Maximum display size `(width, height)` of image fields, by content type and field path.
const DISPLAY_SIZES: &[(&str, &str, u32, u32)] = &[
    ("H5P.MemoryGame", "cards.image", 200, 200),
    ("H5P.MemoryGame", "cards.match", 200, 200),
    ("H5P.ImagePair", "cards.image", 200, 200),
    ("H5P.ImagePair", "cards.match", 200, 200),
    ("H5P.Flashcards", "cards.image", 600, 400),
    ("H5P.Dialogcards", "dialogs.image", 600, 400),
    ("H5P.ImageSequencing", "sequenceImages.image", 300, 300),
    ("H5P.ImageHotspots", "image", 1280, 720),
];

fn size_table(format: &str) -> Option<&'static SizeTable> {
    match format {
        "png" => Some(&PNG),
        "jpeg" | "webp" => Some(&JPEG),
        "gif" => Some(&GIF),
        _ => None,
    }
}

/// Image format from the MIME subtype, falling back to the file extension.
pub(crate) fn image_format(file: &ContentFile) -> Option<String> {
    let from_mime = file
        .mime
        .strip_prefix("image/")
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let format = from_mime.or_else(|| {
        path::file_name(&file.path)
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
    })?;
    Some(if format == "jpg" { "jpeg".to_owned() } else { format })
}

/// Largest recommended byte size for an image of `format` with `pixels` pixels.
pub(crate) fn max_bytes(format: &str, pixels: Option<u64>) -> Option<u64> {
    let table = size_table(format)?;
    let Some(pixels) = pixels else {
        return table.iter().find(|(bp, _)| bp.is_none()).map(|(_, max)| *max);
    };
    table
        .iter()
        .filter_map(|(bp, max)| bp.map(|bp| (bp, *max)))
        .filter(|(bp, _)| *bp <= pixels)
        .max_by_key(|(bp, _)| *bp)
        .map(|(_, max)| max)
}

/// Whether `suffix` names the trailing segments of `field`.
fn is_field_suffix(field: &str, suffix: &str) -> bool {
    field
        .strip_suffix(suffix)
        .is_some_and(|head| head.is_empty() || head.ends_with('.'))
}

/// Largest size with the same aspect ratio that fits into `bound`.
fn scale_into(width: u32, height: u32, bound: (u32, u32)) -> (u32, u32) {
    let scale = f64::min(
        f64::from(bound.0) / f64::from(width),
        f64::from(bound.1) / f64::from(height),
    );
    if scale >= 1.0 {
        return (width, height);
    }
    (
        ((f64::from(width) * scale).floor() as u32).max(1),
        ((f64::from(height) * scale).floor() as u32).max(1),
    )
}

pub struct EfficiencyRules;

impl EfficiencyRules {
    fn image_size(ctx: &AnalysisContext<'_>, content: &Content, file: &ContentFile) -> Option<Message> {
        let format = image_format(file)?;
        let size = file.size?;
        let max = max_bytes(&format, file.pixels())?;
        if size <= max {
            return None;
        }

        let is_jpeg = format == "jpeg";
        let description = vec![
            ctx.text("efficiency.imageSize.reduceResolution", &[]),
            if is_jpeg {
                ctx.text("efficiency.imageSize.reduceQuality", &[])
            } else {
                ctx.text("efficiency.imageSize.convertToJpeg", &[])
            },
        ];

        Some(
            Message::new(
                Category::Efficiency,
                "imageSize",
                Level::Caution,
                ctx.text(
                    "efficiency.imageSize.summary",
                    &[&file.path, &size.to_string(), &max.to_string()],
                ),
            )
            .with_description(description)
            .with_details(
                ctx.details_for(content)
                    .with_path(file.semantics_path.as_str())
                    .with("file", file.path.as_str())
                    .with("format", format.as_str())
                    .with("size", size)
                    .with("maxSize", max),
            )
            .with_remediation(Remediation::ReduceImageSize {
                path: file.path.clone(),
                reduce_resolution: true,
                convert_to_jpeg: !is_jpeg,
                reduce_quality: is_jpeg,
                max_bytes: max,
            }),
        )
    }

    fn image_resolution(
        ctx: &AnalysisContext<'_>,
        content: &Content,
        file: &ContentFile,
    ) -> Option<Message> {
        let machine_name = content.machine_name()?;
        let relative = file
            .semantics_path
            .strip_prefix(content.semantics_path.as_str())
            .map(|rest| rest.trim_start_matches('.'))
            .unwrap_or(&file.semantics_path);
        let field = path::strip_indices(relative);

        let (_, _, display_w, display_h) = DISPLAY_SIZES
            .iter()
            .find(|(name, suffix, _, _)| *name == machine_name && is_field_suffix(&field, suffix))?;
        let (width, height) = (file.width?, file.height?);
        if width == 0 || height == 0 {
            return None;
        }

        let zoom = ctx.config.efficiency.zoom_factor;
        let bound = (display_w.saturating_mul(zoom), display_h.saturating_mul(zoom));
        if width <= bound.0 && height <= bound.1 {
            return None;
        }
        let (max_width, max_height) = scale_into(width, height, bound);

        Some(
            Message::new(
                Category::Efficiency,
                "imageResolution",
                Level::Caution,
                ctx.text(
                    "efficiency.imageResolution.summary",
                    &[&file.path, &width.to_string(), &height.to_string()],
                ),
            )
            .with_recommendation(ctx.text(
                "efficiency.imageResolution.recommendation",
                &[&max_width.to_string(), &max_height.to_string()],
            ))
            .with_details(
                ctx.details_for(content)
                    .with_path(file.semantics_path.as_str())
                    .with("file", file.path.as_str())
                    .with("width", width)
                    .with("height", height),
            )
            .with_remediation(Remediation::ScaleDown {
                path: file.path.clone(),
                max_width,
                max_height,
            }),
        )
    }
}

impl RuleModule for EfficiencyRules {
    fn name(&self) -> &'static str {
        "efficiency"
    }

    fn category(&self) -> Category {
        Category::Efficiency
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let settings = &ctx.config.efficiency;
        let mut findings = Vec::new();

        for (id, content) in ctx.tree.iter() {
            for file in content.files.iter().filter(|f| f.path.starts_with("images/")) {
                if settings.check_image_size
                    && let Some(message) = Self::image_size(ctx, content, file)
                {
                    findings.push(Finding::on(id, message));
                }
                if settings.check_image_resolution
                    && let Some(message) = Self::image_resolution(ctx, content, file)
                {
                    findings.push(Finding::on(id, message));
                }
            }
        }
        Ok(findings)
    }
}
