#![forbid(unsafe_code)]

//! SVG dimension probing.
//!
//! Vector sources bypass variant generation, but the rendered tag still
//! wants `width`/`height` attributes. Read them from the root element, or
//! fall back to the third and fourth numeric tokens of `viewBox`.

/// Extract (width, height) from an SVG document's root element.
///
/// Unit suffixes (`px`, `pt`, `%`, …) are stripped before parsing and
/// fractional values round to the nearest pixel. Returns `None` for either
/// value that cannot be determined.
pub(crate) fn svg_dimensions(data: &[u8]) -> (Option<u32>, Option<u32>) {
    let Ok(text) = std::str::from_utf8(data) else {
        return (None, None);
    };
    let Ok(doc) = roxmltree::Document::parse(text) else {
        return (None, None);
    };
    let root = doc.root_element();

    let mut width = root.attribute("width").and_then(parse_dimension);
    let mut height = root.attribute("height").and_then(parse_dimension);

    if width.is_none() || height.is_none() {
        if let Some((vb_width, vb_height)) = view_box_dimensions(root.attribute("viewBox")) {
            width = width.or(Some(vb_width));
            height = height.or(Some(vb_height));
        }
    }

    (width, height)
}

/// Third and fourth numeric tokens of a `viewBox` value.
fn view_box_dimensions(view_box: Option<&str>) -> Option<(u32, u32)> {
    let mut nums = view_box?
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(parse_dimension_f32);
    let _min_x = nums.next()?;
    let _min_y = nums.next()?;
    let width = nums.next()?;
    let height = nums.next()?;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some((width.round() as u32, height.round() as u32))
}

fn parse_dimension(value: &str) -> Option<u32> {
    let parsed = parse_dimension_f32(value)?;
    if parsed <= 0.0 {
        return None;
    }
    Some(parsed.round() as u32)
}

/// Parse a length, stripping any trailing unit suffix.
fn parse_dimension_f32(value: &str) -> Option<f32> {
    let trimmed = value.trim();
    let numeric_end = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+')
        .unwrap_or(trimmed.len());
    let parsed: f32 = trimmed[..numeric_end].parse().ok()?;
    parsed.is_finite().then_some(parsed)
}
