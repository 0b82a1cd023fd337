use seedlab_bridge::{
    analysis::{ListadoInput, ListadoKind},
    catalog::EntityForm,
    lote::LoteRequest,
};

use super::ValidationError;
use crate::api::catalogs::{
    CatalogRequest, CultivarRequest, LookupRequest, SpeciesRequest, WeedRequest,
};

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(value.to_owned())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Validates the catalog dialog and builds the request body for its entity
/// kind.
pub fn build_catalog_request(form: &EntityForm) -> Result<CatalogRequest, ValidationError> {
    match form {
        EntityForm::Lookup { tipo, valor } => Ok(CatalogRequest::Lookup(LookupRequest {
            tipo: *tipo,
            valor: required(valor, "valor")?,
        })),
        EntityForm::Species {
            nombre_comun,
            nombre_cientifico,
        } => Ok(CatalogRequest::Species(SpeciesRequest {
            nombre_comun: required(nombre_comun, "nombre común")?,
            nombre_cientifico: optional(nombre_cientifico),
        })),
        EntityForm::Cultivar {
            especie_id,
            nombre,
            descripcion,
        } => {
            let especie_id = especie_id.ok_or(ValidationError::Required { field: "especie" })?;
            Ok(CatalogRequest::Cultivar(CultivarRequest {
                especie_id,
                nombre: required(nombre, "nombre")?,
                descripcion: optional(descripcion),
            }))
        }
        EntityForm::Weed {
            nombre_comun,
            nombre_cientifico,
        } => Ok(CatalogRequest::Weed(WeedRequest {
            nombre_comun: required(nombre_comun, "nombre común")?,
            nombre_cientifico: optional(nombre_cientifico),
        })),
    }
}

/// Validates a DOSN listado and returns the body to submit.
///
/// An unlisted species ("otra especie") is identified by its typed name and
/// drops any catalog reference. Otherwise weed listados need a weed entry and
/// crop listados need a species.
pub fn validate_listado(input: &ListadoInput) -> Result<ListadoInput, ValidationError> {
    let tipo = input.tipo.ok_or(ValidationError::Required { field: "tipo" })?;
    if input.cantidad <= 0 {
        return Err(ValidationError::NonPositiveQuantity);
    }

    if input.otra_especie {
        return Ok(ListadoInput {
            tipo: Some(tipo),
            catalogo_id: None,
            especie_id: None,
            otra_especie: true,
            nombre_otra_especie: required(&input.nombre_otra_especie, "nombre de la especie")?,
            cantidad: input.cantidad,
        });
    }

    match tipo {
        ListadoKind::Maleza | ListadoKind::MalezaToleranciaCero if input.catalogo_id.is_none() => {
            Err(ValidationError::Required { field: "maleza" })
        }
        ListadoKind::OtroCultivo | ListadoKind::Brassica if input.especie_id.is_none() => {
            Err(ValidationError::Required { field: "especie" })
        }
        _ => Ok(ListadoInput {
            tipo: Some(tipo),
            nombre_otra_especie: String::new(),
            ..input.clone()
        }),
    }
}

pub fn validate_lote(request: &LoteRequest) -> Result<LoteRequest, ValidationError> {
    let ficha = required(&request.ficha, "ficha")?;
    if request.kilos_limpios.is_some_and(|kilos| kilos < 0.0) {
        return Err(ValidationError::NegativeCount {
            field: "kilos limpios",
        });
    }

    let mut tipos = request.tipos_analisis_asignados.clone();
    tipos.dedup();
    Ok(LoteRequest {
        ficha,
        nom_lote: request.nom_lote.as_deref().and_then(optional),
        observaciones: request.observaciones.as_deref().and_then(optional),
        tipos_analisis_asignados: tipos,
        ..request.clone()
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use seedlab_bridge::catalog::CatalogType;

    use super::*;

    #[test]
    fn lookup_value_is_trimmed() {
        let form = EntityForm::Lookup {
            tipo: CatalogType::Humedad,
            valor: "  12% ".to_owned(),
        };
        assert_eq!(
            build_catalog_request(&form),
            Ok(CatalogRequest::Lookup(LookupRequest {
                tipo: CatalogType::Humedad,
                valor: "12%".to_owned(),
            }))
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        let form = EntityForm::Weed {
            nombre_comun: "   ".to_owned(),
            nombre_cientifico: "Sorghum halepense".to_owned(),
        };
        assert_eq!(
            build_catalog_request(&form),
            Err(ValidationError::Required {
                field: "nombre común"
            })
        );
    }

    #[test]
    fn cultivar_needs_a_species() {
        let mut form = EntityForm::Cultivar {
            especie_id: None,
            nombre: "INIA Tijereta".to_owned(),
            descripcion: String::new(),
        };
        assert_eq!(
            build_catalog_request(&form),
            Err(ValidationError::Required { field: "especie" })
        );

        if let EntityForm::Cultivar { especie_id, .. } = &mut form {
            *especie_id = Some(3);
        }
        assert_eq!(
            build_catalog_request(&form),
            Ok(CatalogRequest::Cultivar(CultivarRequest {
                especie_id: 3,
                nombre: "INIA Tijereta".to_owned(),
                descripcion: None,
            }))
        );
    }

    #[test]
    fn unlisted_species_needs_a_name() {
        let input = ListadoInput {
            tipo: Some(ListadoKind::OtroCultivo),
            otra_especie: true,
            nombre_otra_especie: " ".to_owned(),
            cantidad: 2,
            ..Default::default()
        };
        assert_eq!(
            validate_listado(&input),
            Err(ValidationError::Required {
                field: "nombre de la especie"
            })
        );

        let input = ListadoInput {
            nombre_otra_especie: "Avena negra".to_owned(),
            especie_id: Some(9),
            ..input
        };
        let accepted = validate_listado(&input).unwrap();
        assert_eq!(accepted.nombre_otra_especie, "Avena negra");
        assert_eq!(accepted.especie_id, None);
    }

    #[test]
    fn listado_quantity_must_be_positive() {
        let input = ListadoInput {
            tipo: Some(ListadoKind::Maleza),
            catalogo_id: Some(4),
            cantidad: 0,
            ..Default::default()
        };
        assert_eq!(
            validate_listado(&input),
            Err(ValidationError::NonPositiveQuantity)
        );
    }

    #[test]
    fn weed_listado_needs_a_weed() {
        let input = ListadoInput {
            tipo: Some(ListadoKind::MalezaToleranciaCero),
            cantidad: 1,
            ..Default::default()
        };
        assert_eq!(
            validate_listado(&input),
            Err(ValidationError::Required { field: "maleza" })
        );
    }

    #[test]
    fn lote_requires_ficha() {
        let request = LoteRequest {
            ficha: " ".to_owned(),
            ..Default::default()
        };
        assert_eq!(
            validate_lote(&request),
            Err(ValidationError::Required { field: "ficha" })
        );

        let request = LoteRequest {
            ficha: "L-2024-01 ".to_owned(),
            nom_lote: Some(String::new()),
            ..Default::default()
        };
        let accepted = validate_lote(&request).unwrap();
        assert_eq!(accepted.ficha, "L-2024-01");
        assert_eq!(accepted.nom_lote, None);
    }
}
