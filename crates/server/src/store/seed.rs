//! Demo catalog and profiles for local development and tests.

use rust_decimal::{Decimal, dec};

use stockvision_core::{Price, ProductId, UserId, UserRole};

use crate::models::{Product, UserProfile};

use super::MemoryStore;

/// Load the demo catalog and profiles into the store.
pub async fn demo_data(store: &MemoryStore) {
    for product in demo_products() {
        store.insert_product(product).await;
    }
    for profile in demo_profiles() {
        store.upsert_profile(profile).await;
    }
    tracing::info!("demo catalog and profiles loaded");
}

fn product(
    id: &str,
    code: &str,
    name: &str,
    category: &str,
    price: Decimal,
    stock: u32,
    min_stock: u32,
    provider: &str,
) -> Product {
    Product {
        id: ProductId::new(id),
        code: code.to_owned(),
        name: name.to_owned(),
        category: category.to_owned(),
        price: Price::new(price),
        stock,
        min_stock,
        provider: provider.to_owned(),
        image_url: format!("https://picsum.photos/seed/{id}/400/400"),
    }
}

/// The demo grocery catalog.
#[must_use]
pub fn demo_products() -> Vec<Product> {
    vec![
        product("prod_1", "77900101", "Refresco Cola", "Bebidas", dec!(150.00), 80, 20, "Distribuidora S.A."),
        product("prod_2", "77900202", "Café Molido", "Almacén", dec!(500.00), 15, 10, "Cafetal SRL"),
        product("prod_3", "77900303", "Pan de Molde", "Panadería", dec!(250.00), 40, 15, "Panificadora El Trigo"),
        product("prod_4", "77900404", "Leche Entera", "Lácteos", dec!(180.00), 5, 10, "Lácteos del Sur"),
        product("prod_5", "77900505", "Huevos de Campo", "Almacén", dec!(300.00), 25, 10, "Granja La Familia"),
        product("prod_6", "77900606", "Chocolate Amargo", "Snacks", dec!(220.00), 50, 20, "Chocolates Premium"),
        product("prod_7", "77900707", "Papas Fritas", "Snacks", dec!(130.00), 100, 30, "Distribuidora S.A."),
        product("prod_8", "77900808", "Cereal de Maíz", "Almacén", dec!(350.00), 18, 10, "Cereales Matutinos"),
        product("prod_9", "77900909", "Mermelada de Frutilla", "Almacén", dec!(280.00), 30, 15, "Dulces del Campo"),
        product("prod_10", "77901010", "Agua Mineral", "Bebidas", dec!(100.00), 120, 50, "Manantiales Puros"),
    ]
}

/// The demo user profiles: one administrator, one seller, one customer.
#[must_use]
pub fn demo_profiles() -> Vec<UserProfile> {
    vec![
        UserProfile {
            id: UserId::new("user_1"),
            name: "Admin User".to_owned(),
            email: "admin@stockvision.test".to_owned(),
            role: UserRole::Admin,
        },
        UserProfile {
            id: UserId::new("user_2"),
            name: "Seller User".to_owned(),
            email: "seller@stockvision.test".to_owned(),
            role: UserRole::Seller,
        },
        UserProfile {
            id: UserId::new("user_3"),
            name: "Cliente User".to_owned(),
            email: "cliente@stockvision.test".to_owned(),
            role: UserRole::Cliente,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryStore::new();
        demo_data(&store).await;
        demo_data(&store).await;
        assert_eq!(store.products().await.len(), 10);
    }

    #[tokio::test]
    async fn demo_catalog_has_the_expected_low_stock_products() {
        let store = MemoryStore::new();
        demo_data(&store).await;
        let low = store.low_stock_products().await;
        let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();
        // Leche Entera (5/10) is under minimum.
        assert!(names.contains(&"Leche Entera"));
        assert!(!names.contains(&"Agua Mineral"));
    }
}
