use phf::{Map, phf_map};

static COMPARTMENT_ALIASES: Map<&'static str, &'static str> = phf_map! {
    "p" => "p", "p0" => "p", "periplasm" => "p", "periplasm_0" => "p", "mnxc19" => "p",
    "c" => "c", "c0" => "c", "cytosol" => "c", "cytosol_0" => "c",
    "cytoplasm" => "c", "cytoplasm_0" => "c", "mnxc3" => "c",
    "e" => "e", "e0" => "e", "extracellular" => "e", "extracellular_0" => "e",
    "extracellular space" => "e", "mnxc2" => "e",
    "m" => "m", "mitochondria" => "m", "mitochondria_0" => "m", "mnxc4" => "m",
    "b" => "b", "boundary" => "b",
    "x" => "p/glyoxysome", "mnxc24" => "p/glyoxysome", "mnxc13" => "p/glyoxysome",
    "h" => "h", "choloroplast" => "h", "chloroplast" => "h", "mnxc8" => "h",
    "v" => "v", "vacuole" => "v", "mnxc9" => "v",
    "n" => "n", "nucleus" => "n", "mnxc6" => "n",
};

/// Maps a compartment name or code onto its short code, ignoring case.
pub fn map_compartment(alias: &str) -> Option<&'static str> {
    COMPARTMENT_ALIASES
        .get(alias.trim().to_lowercase().as_str())
        .copied()
}

/// Splits a trailing compartment suffix off a local identifier.
///
/// The last `@` is preferred as separator, otherwise the last `_`.
pub fn split_compartment_suffix(local_id: &str) -> Option<(&str, &str)> {
    local_id
        .rsplit_once('@')
        .or_else(|| local_id.rsplit_once('_'))
}

/// Strips one trailing compartment suffix, returning the input when none is present.
pub fn strip_compartment_suffix(local_id: &str) -> &str {
    split_compartment_suffix(local_id)
        .map(|(base, _)| base)
        .unwrap_or(local_id)
}
