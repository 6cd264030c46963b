use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// A catalog document as loaded by `mongoimport`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user: String,
    pub rating: f64,
    pub comment: String,
    pub date: DateTime,
}

/// A review before it is stamped and pushed.
#[derive(Clone, Debug, PartialEq)]
pub struct NewReview {
    pub user: String,
    pub rating: f64,
    pub comment: String,
}

impl NewReview {
    pub fn new(user: impl Into<String>, rating: f64, comment: impl Into<String>) -> Self {
        NewReview {
            user: user.into(),
            rating,
            comment: comment.into(),
        }
    }

    pub fn stamp(&self, date: DateTime) -> Review {
        Review {
            user: self.user.clone(),
            rating: self.rating,
            comment: self.comment.clone(),
            date,
        }
    }
}

// Result rows. Field names follow the projected documents.

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProductRating {
    pub product_id: String,
    pub name: String,
    #[serde(rename = "avgRating")]
    pub avg_rating: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CategoryPrice {
    pub category: String,
    pub avg_price: f64,
    pub product_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc, Bson};

    #[test]
    fn review_serializes_with_bson_date() {
        let date = DateTime::from_millis(1_700_000_000_000);
        let review = NewReview::new("U999", 4.0, "Good value").stamp(date);
        let encoded = bson::to_document(&review).unwrap();

        assert_eq!(
            encoded,
            doc! { "user": "U999", "rating": 4.0, "comment": "Good value", "date": date }
        );
        assert_eq!(encoded.get("date"), Some(&Bson::DateTime(date)));
    }

    #[test]
    fn product_accepts_integer_prices_and_missing_reviews() {
        let product: Product = bson::from_document(doc! {
            "_id": bson::oid::ObjectId::new(),
            "product_id": "HOME002",
            "name": "Desk Lamp",
            "category": "Home",
            "price": 1299_i32,
            "stock": 40_i64,
        })
        .unwrap();

        assert_eq!(product.price, 1299.0);
        assert_eq!(product.stock, 40);
        assert!(product.reviews.is_empty());
    }

    #[test]
    fn rating_row_reads_camel_case_average() {
        let row: ProductRating = bson::from_document(doc! {
            "name": "Wireless Mouse",
            "avgRating": 4.5,
            "product_id": "ELEC002",
        })
        .unwrap();

        assert_eq!(
            row,
            ProductRating {
                product_id: "ELEC002".to_string(),
                name: "Wireless Mouse".to_string(),
                avg_rating: 4.5,
            }
        );
    }

    #[test]
    fn category_row_reads_int32_count() {
        let row: CategoryPrice = bson::from_document(doc! {
            "avg_price": 15000.0,
            "product_count": 2_i32,
            "category": "Electronics",
        })
        .unwrap();

        assert_eq!(row.product_count, 2);
        assert_eq!(row.avg_price, 15000.0);
    }
}
