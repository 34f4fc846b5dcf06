//! Fixtures
//!
//! The demo catalog used by the CLI and the integration tests: wire-shaped
//! documents parsed through the same ingress path as real store data, price
//! formats deliberately mixed (numbers and localized strings).

use rustc_hash::FxHashMap;

use crate::{
    products::{Product, ProductId, ProductRecord},
    store::MemoryStore,
};

/// The demo product collection as stored documents.
const DEMO_PRODUCTS: &str = r#"{
  "malbec-desodorante-colonia": {
    "name": "Malbec Desodorante Colônia",
    "brand": "boticario",
    "category": "Perfumaria",
    "image": "https://images.unsplash.com/photo-1595345763073-2a382be55660?auto=format&fit=crop&q=80&w=600",
    "price": 199.9,
    "stock": 4,
    "description": "Em estoque. Fragrância marcante e amadeirada.",
    "createdAt": "2024-06-01T12:00:00Z"
  },
  "essencial-oud-masculino": {
    "name": "Essencial Oud Masculino",
    "brand": "natura",
    "category": "Perfumaria",
    "image": "https://images.unsplash.com/photo-1523293182086-7651a899d37f?auto=format&fit=crop&q=80&w=600",
    "price": "R$ 239,90",
    "fullPrice": "R$ 299,90",
    "stock": 1,
    "description": "Última unidade. A sofisticação do Oud com a copaíba.",
    "createdAt": "2024-06-02T12:00:00Z"
  },
  "renew-vitamina-c": {
    "name": "Renew Vitamina C",
    "brand": "avon",
    "category": "Skincare",
    "image": "https://images.unsplash.com/photo-1556228852-6d35a585d566?auto=format&fit=crop&q=80&w=600",
    "price": 89.9,
    "stock": 6,
    "description": "Disponível para entrega imediata.",
    "createdAt": "2024-06-03T12:00:00Z"
  },
  "lily-eau-de-parfum": {
    "name": "Lily Eau de Parfum",
    "brand": "boticario",
    "category": "Perfumaria",
    "image": "https://images.unsplash.com/photo-1541643600914-78b084683601?auto=format&fit=crop&q=80&w=600",
    "price": "R$ 299,90",
    "fullPrice": 399.9,
    "stock": 2,
    "description": "Original e lacrado. Pronta entrega.",
    "createdAt": "2024-06-04T12:00:00Z"
  },
  "ekos-castanha-hidratante": {
    "name": "Ekos Castanha Hidratante",
    "brand": "natura",
    "category": "Corpo e Banho",
    "image": "https://images.unsplash.com/photo-1608248597279-f99d160bfbc8?auto=format&fit=crop&q=80&w=600",
    "price": 45.9,
    "stock": 8,
    "description": "Nutrição imediata. Leve agora.",
    "createdAt": "2024-06-05T12:00:00Z"
  },
  "power-stay-batom-liquido": {
    "name": "Power Stay Batom Líquido",
    "brand": "avon",
    "category": "Maquiagem",
    "image": "https://images.unsplash.com/photo-1586495777744-4413f21062fa?auto=format&fit=crop&q=80&w=600",
    "price": 39.9,
    "stock": 0,
    "status": "Sem Estoque",
    "description": "Cores variadas em estoque em Salvador.",
    "createdAt": "2024-06-06T12:00:00Z"
  },
  "anuncio-consultoria": {
    "name": "Consultoria Natura",
    "brand": "Anúncio",
    "image": "https://via.placeholder.com/380x380.png?text=An%C3%BAncio",
    "price": 0,
    "stock": 0,
    "status": "Anúncio",
    "link": "https://www.minhaloja.natura.com/consultoria",
    "sku": "AD-0001",
    "createdAt": "2024-06-07T12:00:00Z"
  }
}"#;

/// The demo collection as identity/record pairs.
///
/// # Errors
///
/// Returns the deserialization error if the embedded fixture is malformed.
pub fn demo_documents() -> Result<Vec<(ProductId, ProductRecord)>, serde_json::Error> {
    let documents: FxHashMap<String, ProductRecord> = serde_json::from_str(DEMO_PRODUCTS)?;

    Ok(documents
        .into_iter()
        .map(|(id, record)| (ProductId::new(id), record))
        .collect())
}

/// A memory store seeded with the demo collection.
///
/// # Errors
///
/// Returns the deserialization error if the embedded fixture is malformed.
pub fn demo_store() -> Result<MemoryStore, serde_json::Error> {
    Ok(MemoryStore::with_products(demo_documents()?))
}

/// The demo collection normalized into domain products, newest first.
///
/// # Errors
///
/// Returns the deserialization error if the embedded fixture is malformed.
pub fn demo_catalog() -> Result<Vec<Product>, serde_json::Error> {
    let mut products: Vec<Product> = demo_documents()?
        .into_iter()
        .map(|(id, record)| Product::from_record(id, record))
        .collect();

    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(products)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::products::{Brand, ProductStatus};

    use super::*;

    #[test]
    fn demo_collection_parses() -> TestResult {
        let documents = demo_documents()?;

        assert_eq!(documents.len(), 7);

        Ok(())
    }

    #[test]
    fn demo_catalog_normalizes_mixed_price_shapes() -> TestResult {
        let catalog = demo_catalog()?;

        let oud = catalog
            .iter()
            .find(|p| p.id.as_str() == "essencial-oud-masculino")
            .expect("missing oud fixture");

        assert_eq!(oud.price, 239_90);
        assert_eq!(oud.full_price, 299_90);
        assert_eq!(oud.discount_percent, 20);

        let malbec = catalog
            .iter()
            .find(|p| p.id.as_str() == "malbec-desodorante-colonia")
            .expect("missing malbec fixture");

        assert_eq!(malbec.price, 199_90);
        assert_eq!(malbec.full_price, 199_90, "no phantom discount");

        Ok(())
    }

    #[test]
    fn demo_catalog_has_exactly_one_announcement() -> TestResult {
        let catalog = demo_catalog()?;

        let adverts: Vec<_> = catalog.iter().filter(|p| p.is_advert()).collect();

        assert_eq!(adverts.len(), 1);
        assert_eq!(adverts.first().map(|p| p.brand), Some(Brand::Announcement));

        Ok(())
    }

    #[test]
    fn demo_catalog_derives_missing_statuses() -> TestResult {
        let catalog = demo_catalog()?;

        let malbec = catalog
            .iter()
            .find(|p| p.id.as_str() == "malbec-desodorante-colonia")
            .expect("missing malbec fixture");
        let batom = catalog
            .iter()
            .find(|p| p.id.as_str() == "power-stay-batom-liquido")
            .expect("missing batom fixture");

        assert_eq!(malbec.status, ProductStatus::Active);
        assert_eq!(batom.status, ProductStatus::OutOfStock);

        Ok(())
    }

    #[test]
    fn demo_catalog_is_newest_first() -> TestResult {
        let catalog = demo_catalog()?;

        assert_eq!(
            catalog.first().map(|p| p.id.as_str()),
            Some("anuncio-consultoria"),
            "the announcement is the newest entry"
        );

        Ok(())
    }
}
