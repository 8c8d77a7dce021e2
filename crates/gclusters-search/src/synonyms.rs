//! Common-name normalization for object queries.
//!
//! Visitors type "andromeda" or "the crab nebula"; catalog services want
//! "M31" and "M1". The dictionary is ordered: longer, more specific
//! phrases precede the short names they contain.

/// Shortest synonym eligible for a contained (non-exact) match.
const MIN_PARTIAL_LEN: usize = 4;

const SYNONYMS: &[(&str, &str)] = &[
    // Galaxies
    ("andromeda", "M31"),
    ("andromeda galaxy", "M31"),
    ("messier 31", "M31"),
    ("ngc 224", "M31"),
    ("whirlpool", "M51"),
    ("whirlpool galaxy", "M51"),
    ("messier 51", "M51"),
    ("ngc 5194", "M51"),
    ("triangulum", "M33"),
    ("triangulum galaxy", "M33"),
    ("messier 33", "M33"),
    ("ngc 598", "M33"),
    ("sombrero", "M104"),
    ("sombrero galaxy", "M104"),
    ("messier 104", "M104"),
    ("ngc 4594", "M104"),
    // Nebulae
    ("orion nebula", "M42"),
    ("messier 42", "M42"),
    ("ngc 1976", "M42"),
    ("crab nebula", "M1"),
    ("messier 1", "M1"),
    ("ngc 1952", "M1"),
    ("horsehead", "Barnard 33"),
    ("horsehead nebula", "Barnard 33"),
    ("eagle nebula", "M16"),
    ("messier 16", "M16"),
    ("ngc 6611", "M16"),
    // Galaxy clusters
    ("coma cluster", "Abell 1656"),
    ("coma", "Abell 1656"),
    ("virgo cluster", "Abell 1367"),
    ("virgo", "Abell 1367"),
    ("perseus cluster", "Abell 426"),
    ("perseus", "Abell 426"),
    ("centaurus cluster", "Abell 3526"),
    ("centaurus", "Abell 3526"),
    // Stars
    ("sirius", "HD 48915"),
    ("vega", "Alpha Lyrae"),
    ("altair", "Alpha Aquilae"),
    ("rigel", "Beta Orionis"),
    ("betelgeuse", "Alpha Orionis"),
    ("aldebaran", "Alpha Tauri"),
    ("spica", "Alpha Virginis"),
    ("arcturus", "Alpha Bootis"),
    ("capella", "Alpha Aurigae"),
    ("procyon", "Alpha Canis Minoris"),
    ("polaris", "Alpha Ursae Minoris"),
    ("north star", "Alpha Ursae Minoris"),
    // Solar system
    ("jupiter", "Jupiter"),
    ("saturn", "Saturn"),
    ("mars", "Mars"),
    ("venus", "Venus"),
    ("mercury", "Mercury"),
    ("uranus", "Uranus"),
    ("neptune", "Neptune"),
    ("pluto", "Pluto"),
    ("moon", "Luna"),
    ("europa", "Jupiter II"),
    ("titan", "Saturn VI"),
    ("io", "Jupiter I"),
    ("ganymede", "Jupiter III"),
    ("callisto", "Jupiter IV"),
];

/// Map a common name to its catalog designation.
///
/// An exact (case-insensitive, trimmed) match wins. Otherwise the first
/// dictionary entry of at least four characters contained in the query is
/// used. Unmatched queries are returned unchanged.
pub fn normalize_query(query: &str) -> String {
    let lower = query.trim().to_lowercase();
    if lower.is_empty() {
        return query.to_string();
    }

    if let Some((_, canonical)) = SYNONYMS.iter().find(|(name, _)| *name == lower) {
        log::debug!("Synonym found: \"{query}\" -> \"{canonical}\"");
        return (*canonical).to_string();
    }

    if let Some((name, canonical)) = SYNONYMS
        .iter()
        .find(|(name, _)| name.len() >= MIN_PARTIAL_LEN && lower.contains(name))
    {
        log::debug!("Partial synonym found: \"{query}\" contains \"{name}\" -> \"{canonical}\"");
        return (*canonical).to_string();
    }

    query.to_string()
}
