use serde::{Deserialize, Serialize};

/// The lookup tables served by `/api/catalogo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogType {
    Humedad,
    Articulo,
    Origen,
    Estado,
    Deposito,
    UnidadEmbolsado,
}

impl CatalogType {
    pub const ALL: [CatalogType; 6] = [
        CatalogType::Humedad,
        CatalogType::Articulo,
        CatalogType::Origen,
        CatalogType::Estado,
        CatalogType::Deposito,
        CatalogType::UnidadEmbolsado,
    ];

    /// Tag used by the backend, also accepted as the `tipo` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogType::Humedad => "HUMEDAD",
            CatalogType::Articulo => "ARTICULO",
            CatalogType::Origen => "ORIGEN",
            CatalogType::Estado => "ESTADO",
            CatalogType::Deposito => "DEPOSITO",
            CatalogType::UnidadEmbolsado => "UNIDAD_EMBOLSADO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CatalogType::Humedad => "Humedad",
            CatalogType::Articulo => "Artículo",
            CatalogType::Origen => "Origen",
            CatalogType::Estado => "Estado",
            CatalogType::Deposito => "Depósito",
            CatalogType::UnidadEmbolsado => "Unidad de embolsado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: i64,
    pub tipo: CatalogType,
    pub valor: String,
    pub activo: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    #[serde(rename = "especieID")]
    pub id: i64,
    pub nombre_comun: String,
    pub nombre_cientifico: Option<String>,
    pub activo: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cultivar {
    #[serde(rename = "cultivarID")]
    pub id: i64,
    pub especie_id: i64,
    pub especie_nombre: Option<String>,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub activo: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Weed {
    #[serde(rename = "catalogoID")]
    pub id: i64,
    pub nombre_comun: String,
    pub nombre_cientifico: Option<String>,
    pub activo: bool,
}

/// Which entity the catalog page is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Lookup(CatalogType),
    Species,
    Cultivar,
    Weed,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Lookup(tipo) => tipo.label(),
            EntityKind::Species => "Especies",
            EntityKind::Cultivar => "Cultivares",
            EntityKind::Weed => "Malezas",
        }
    }
}

/// A row of any catalog-like table.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry {
    Lookup(CatalogItem),
    Species(Species),
    Cultivar(Cultivar),
    Weed(Weed),
}

impl CatalogEntry {
    pub fn id(&self) -> i64 {
        match self {
            CatalogEntry::Lookup(item) => item.id,
            CatalogEntry::Species(species) => species.id,
            CatalogEntry::Cultivar(cultivar) => cultivar.id,
            CatalogEntry::Weed(weed) => weed.id,
        }
    }

    pub fn active(&self) -> bool {
        match self {
            CatalogEntry::Lookup(item) => item.activo,
            CatalogEntry::Species(species) => species.activo,
            CatalogEntry::Cultivar(cultivar) => cultivar.activo,
            CatalogEntry::Weed(weed) => weed.activo,
        }
    }

    /// Text shown in the main column of the table.
    pub fn display_name(&self) -> String {
        match self {
            CatalogEntry::Lookup(item) => item.valor.clone(),
            CatalogEntry::Species(species) => species.nombre_comun.clone(),
            CatalogEntry::Cultivar(cultivar) => match &cultivar.especie_nombre {
                Some(especie) => format!("{} ({especie})", cultivar.nombre),
                None => cultivar.nombre.clone(),
            },
            CatalogEntry::Weed(weed) => weed.nombre_comun.clone(),
        }
    }

    pub fn secondary_text(&self) -> Option<String> {
        match self {
            CatalogEntry::Lookup(_) => None,
            CatalogEntry::Species(species) => species.nombre_cientifico.clone(),
            CatalogEntry::Cultivar(cultivar) => cultivar.descripcion.clone(),
            CatalogEntry::Weed(weed) => weed.nombre_cientifico.clone(),
        }
    }
}

/// Form data of the catalog dialog. One dialog serves every entity kind; the
/// variant decides which validator and which request body apply.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityForm {
    Lookup {
        tipo: CatalogType,
        valor: String,
    },
    Species {
        nombre_comun: String,
        nombre_cientifico: String,
    },
    Cultivar {
        especie_id: Option<i64>,
        nombre: String,
        descripcion: String,
    },
    Weed {
        nombre_comun: String,
        nombre_cientifico: String,
    },
}

impl EntityForm {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityForm::Lookup { tipo, .. } => EntityKind::Lookup(*tipo),
            EntityForm::Species { .. } => EntityKind::Species,
            EntityForm::Cultivar { .. } => EntityKind::Cultivar,
            EntityForm::Weed { .. } => EntityKind::Weed,
        }
    }
}
