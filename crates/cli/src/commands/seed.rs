//! Catalog seed command.
//!
//! Loads the built-in embroidery design list into the catalog. Safe to
//! re-run: products are upserted by name and their format rows replaced, so
//! price/text/image changes in the list propagate on the next run.

use stitchery_core::{FileFormat, Tier, normalize_formats};
use stitchery_server::db::ProductRepository;
use stitchery_server::models::NewProduct;

use super::{CommandError, connect};

/// One entry of the built-in catalog.
struct SeedProduct {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    tier: Tier,
    price: i32,
    image_url: &'static str,
    is_featured: bool,
    formats: &'static [&'static str],
}

const DEFAULT_FORMATS: &[&str] = &["JEF", "PES", "DST"];

const SEED: &[SeedProduct] = &[
    SeedProduct {
        name: "Cáliz (chico)",
        description: "Diseño para bordado digital. Ideal para aplicaciones religiosas",
        category: "Religioso",
        tier: Tier::Premium,
        price: 2990,
        image_url: "/designs/previews/caliz-chico.png",
        is_featured: true,
        formats: DEFAULT_FORMATS,
    },
    SeedProduct {
        name: "Agrícola EIRL",
        description: "Logo para bordado corporativo",
        category: "Logos",
        tier: Tier::Premium,
        price: 2500,
        image_url: "/designs/previews/agricola-eirl.png",
        is_featured: false,
        formats: DEFAULT_FORMATS,
    },
    SeedProduct {
        name: "Aires Coltauquinos",
        description: "Logo para bordado corporativo",
        category: "Logos",
        tier: Tier::Premium,
        price: 1000,
        image_url: "/designs/previews/aires-coltauquinos.png",
        is_featured: false,
        formats: DEFAULT_FORMATS,
    },
    SeedProduct {
        name: "Alianza",
        description: "Logo para bordado",
        category: "Logos",
        tier: Tier::Premium,
        price: 3990,
        image_url: "/designs/previews/alianza.png",
        is_featured: false,
        formats: DEFAULT_FORMATS,
    },
    SeedProduct {
        name: "Árbol de Corazones",
        description: "Diseño decorativo para bordado. Perfecto para regalos y proyectos románticos",
        category: "Amor",
        tier: Tier::Pro,
        price: 2990,
        image_url: "/designs/previews/arbol-de-corazones.png",
        is_featured: true,
        formats: DEFAULT_FORMATS,
    },
    SeedProduct {
        name: "Ask Your Boy",
        description: "Texto/frase para bordado",
        category: "Frases",
        tier: Tier::Standard,
        price: 2490,
        image_url: "/designs/previews/ask-your-boy.png",
        is_featured: false,
        formats: DEFAULT_FORMATS,
    },
    SeedProduct {
        name: "Bandera 6x4",
        description: "Diseño patriótico para bordado",
        category: "Patriótico",
        tier: Tier::Pro,
        price: 2990,
        image_url: "/designs/previews/bandera-6x4.png",
        is_featured: false,
        formats: DEFAULT_FORMATS,
    },
    SeedProduct {
        name: "Búho 5",
        description: "Diseño de animal para bordado",
        category: "Animales",
        tier: Tier::Pro,
        price: 2990,
        image_url: "/designs/previews/buho-5.png",
        is_featured: false,
        formats: DEFAULT_FORMATS,
    },
    SeedProduct {
        name: "Búho H",
        description: "Diseño de animal para bordado",
        category: "Animales",
        tier: Tier::Pro,
        price: 2990,
        image_url: "/designs/previews/buho-h.png",
        is_featured: false,
        formats: DEFAULT_FORMATS,
    },
    SeedProduct {
        name: "Caballo + Herradura",
        description: "Diseño de animal para bordado",
        category: "Animales",
        tier: Tier::Pro,
        price: 2990,
        image_url: "/designs/previews/caballo-herradura.png",
        is_featured: false,
        formats: DEFAULT_FORMATS,
    },
];

/// Seed the catalog.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an upsert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let repo = ProductRepository::new(&pool);

    for entry in SEED {
        let formats = normalize_formats(entry.formats.iter().copied());
        let description = with_included_formats(entry.description, &formats);

        let product = NewProduct {
            name: entry.name.to_string(),
            description,
            price: entry.price,
            tier: entry.tier,
            category: entry.category.to_string(),
            image_url: entry.image_url.to_string(),
            is_new: false,
            is_bestseller: false,
            is_featured: entry.is_featured,
            is_active: true,
        };

        let product_id = repo.upsert_by_name(&product, &formats).await?;
        tracing::info!(product_id = %product_id, name = entry.name, "seeded");
    }

    tracing::info!("Seed complete: products and product_formats are in sync");
    Ok(())
}

/// Append an "Incluye formatos: ..." suffix to a description, exactly once,
/// so re-running the seed does not stack suffixes.
fn with_included_formats(description: &str, formats: &[FileFormat]) -> String {
    let clean = description.trim();

    if clean.to_lowercase().contains("incluye formatos:") {
        return clean.to_string();
    }

    let listed = formats
        .iter()
        .map(|f| format!(".{f}"))
        .collect::<Vec<_>>()
        .join(", ");
    let suffix = format!("Incluye formatos: {listed}.");

    if clean.is_empty() {
        return suffix;
    }

    if clean.ends_with('.') {
        format!("{clean} {suffix}")
    } else {
        format!("{clean}. {suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<FileFormat> {
        normalize_formats(["JEF", "PES", "DST"])
    }

    #[test]
    fn test_suffix_appended_once() {
        let first = with_included_formats("Diseño de prueba", &formats());
        assert_eq!(
            first,
            "Diseño de prueba. Incluye formatos: .JEF, .PES, .DST."
        );

        // Re-running must not stack suffixes
        let second = with_included_formats(&first, &formats());
        assert_eq!(second, first);
    }

    #[test]
    fn test_suffix_on_trailing_period() {
        let result = with_included_formats("Ya termina en punto.", &formats());
        assert_eq!(
            result,
            "Ya termina en punto. Incluye formatos: .JEF, .PES, .DST."
        );
    }

    #[test]
    fn test_suffix_on_empty_description() {
        let result = with_included_formats("  ", &formats());
        assert_eq!(result, "Incluye formatos: .JEF, .PES, .DST.");
    }

    #[test]
    fn test_seed_formats_normalized() {
        let normalized = normalize_formats(["jef", "JEF", " pes "]);
        let codes: Vec<&str> = normalized.iter().map(FileFormat::as_str).collect();
        assert_eq!(codes, vec!["JEF", "PES"]);
    }
}
