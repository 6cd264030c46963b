use mongodb::results::UpdateResult;
use mongodb::Collection;

use crate::error::Result;
use crate::model::{CategoryPrice, NewReview, Product, ProductRating, ProductSummary};
use crate::mongo::catalog_handler::{
    avg_price_by_category, find_by_category_under_price, high_rated_products, push_review,
};

/// Inputs of the catalog walkthrough.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkflowParams {
    pub category: String,
    pub price_ceiling: f64,
    pub min_rating: f64,
    pub product_id: String,
    pub review: NewReview,
}

impl Default for WorkflowParams {
    fn default() -> Self {
        WorkflowParams {
            category: "Electronics".to_string(),
            price_ceiling: 50000.0,
            min_rating: 4.0,
            product_id: "ELEC001".to_string(),
            review: NewReview::new("U999", 4.0, "Good value"),
        }
    }
}

#[derive(Debug)]
pub struct WorkflowReport {
    pub affordable: Vec<ProductSummary>,
    pub high_rated: Vec<ProductRating>,
    pub review_update: UpdateResult,
    pub category_prices: Vec<CategoryPrice>,
}

/// Runs the four catalog operations in order and prints each result.
/// The first failing operation ends the run.
pub async fn run(products: Collection<Product>, params: &WorkflowParams) -> Result<WorkflowReport> {
    let affordable =
        find_by_category_under_price(&products, &params.category, params.price_ceiling).await?;
    println!(
        "{} under {}: {:#?}",
        params.category,
        short_amount(params.price_ceiling),
        affordable
    );

    let high_rated = high_rated_products(&products, params.min_rating).await?;
    println!("High rated products: {:#?}", high_rated);

    let review_update = push_review(&products, &params.product_id, &params.review).await?;
    println!("Review added to {}", params.product_id);

    let category_prices = avg_price_by_category(&products).await?;
    println!("Average price by category: {:#?}", category_prices);

    Ok(WorkflowReport {
        affordable,
        high_rated,
        review_update,
        category_prices,
    })
}

// 50000 -> "50k", 1250 -> "1250"
fn short_amount(amount: f64) -> String {
    if amount >= 1000.0 && amount % 1000.0 == 0.0 {
        format!("{}k", amount / 1000.0)
    } else {
        format!("{}", amount)
    }
}
