//! Fixtures

use crate::catalog::{Catalog, CatalogError};

const DEMO_CATALOG_JSON: &str = r#"{
  "products": [
    {
      "id": 1,
      "name": "Aurora Wireless Headphones",
      "price": 79.99,
      "discount": 15,
      "stock": 23,
      "rating": 4.5,
      "reviewCount": 128,
      "category": "audio",
      "image": "/images/aurora-headphones.jpg",
      "description": "Over-ear wireless headphones with active noise cancelling and a 30-hour battery.",
      "dateAdded": "2024-01-15",
      "featured": true,
      "specs": { "sku": "AUR-WH-100", "weight": "254 g", "battery": "30 h" }
    },
    {
      "id": 2,
      "name": "Pulse Bluetooth Speaker",
      "price": 49.99,
      "stock": 45,
      "rating": 4.2,
      "reviewCount": 89,
      "category": "audio",
      "image": "/images/pulse-speaker.jpg",
      "description": "Room-filling portable speaker with twelve hours of playtime.",
      "dateAdded": "2024-02-10",
      "specs": { "sku": "PUL-BS-200" }
    },
    {
      "id": 3,
      "name": "Nimbus Smartwatch",
      "price": 199.99,
      "discount": 10,
      "stock": 12,
      "rating": 4.7,
      "reviewCount": 214,
      "category": "wearables",
      "image": "/images/nimbus-smartwatch.jpg",
      "description": "Always-on display, heart-rate tracking and a week of battery.",
      "dateAdded": "2024-03-05",
      "featured": true,
      "specs": { "sku": "NIM-SW-300", "water resistance": "5 ATM" }
    },
    {
      "id": 4,
      "name": "Flux USB-C Hub",
      "price": 34.99,
      "stock": 67,
      "rating": 4.0,
      "reviewCount": 41,
      "category": "accessories",
      "image": "/images/flux-hub.jpg",
      "description": "Seven ports in an aluminium shell, including HDMI and gigabit ethernet.",
      "dateAdded": "2023-11-20"
    },
    {
      "id": 5,
      "name": "Orbit 4K Webcam",
      "price": 89.99,
      "discount": 20,
      "stock": 0,
      "rating": 4.3,
      "reviewCount": 77,
      "category": "video",
      "image": "/images/orbit-webcam.jpg",
      "description": "Sharp 4K sensor with auto-framing and a privacy shutter.",
      "dateAdded": "2023-12-08"
    },
    {
      "id": 6,
      "name": "Quartz Mechanical Keyboard",
      "price": 129.99,
      "stock": 8,
      "rating": 4.8,
      "reviewCount": 301,
      "category": "accessories",
      "image": "/images/quartz-keyboard.jpg",
      "description": "Hot-swappable switches under double-shot keycaps, wired or wireless.",
      "dateAdded": "2024-04-18",
      "featured": true,
      "specs": { "sku": "QTZ-KB-600", "layout": "ISO" }
    },
    {
      "id": 7,
      "name": "Drift Gaming Mouse",
      "price": 59.99,
      "discount": 25,
      "stock": 3,
      "rating": 4.6,
      "reviewCount": 167,
      "category": "accessories",
      "image": "/images/drift-mouse.jpg",
      "description": "Lightweight 58-gram shell around a 26K DPI sensor.",
      "dateAdded": "2024-05-02"
    },
    {
      "id": 8,
      "name": "Echo Desk Lamp",
      "price": 24.99,
      "stock": 150,
      "rating": 3.9,
      "reviewCount": 12,
      "category": "home",
      "image": "/images/echo-lamp.jpg",
      "description": "Warm-to-cool dimmable light with a wireless charging base.",
      "dateAdded": "2023-10-01"
    }
  ]
}"#;

/// Builds the built-in demo catalog.
///
/// # Errors
///
/// * [`CatalogError::Json`] if the embedded document fails to parse.
pub fn demo_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_json_str(DEMO_CATALOG_JSON)
}
