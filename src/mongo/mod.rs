pub mod pipelines {
    //! Filter, update and aggregation documents sent by the catalog handler.
    use mongodb::bson::{doc, Bson, Document};

    pub fn category_price_filter(category: &str, price_ceiling: f64) -> Document {
        doc! { "category": category, "price": { "$lt": price_ceiling } }
    }

    pub fn summary_projection() -> Document {
        doc! { "_id": 0, "name": 1, "price": 1, "stock": 1 }
    }

    pub fn product_filter(product_id: &str) -> Document {
        doc! { "product_id": product_id }
    }

    pub fn push_review_update(review: Bson) -> Document {
        doc! { "$push": { "reviews": review } }
    }

    /// One row per review, averaged back per product. Products without
    /// reviews vanish at the `$unwind` stage.
    pub fn high_rating_pipeline(min_rating: f64) -> Vec<Document> {
        vec![
            doc! { "$unwind": "$reviews" },
            doc! {
                "$group": {
                    "_id": "$product_id",
                    "name": { "$first": "$name" },
                    "avgRating": { "$avg": "$reviews.rating" },
                }
            },
            doc! { "$match": { "avgRating": { "$gte": min_rating } } },
            doc! { "$project": { "_id": 0, "product_id": "$_id", "name": 1, "avgRating": 1 } },
        ]
    }

    pub fn category_price_pipeline() -> Vec<Document> {
        vec![
            doc! {
                "$group": {
                    "_id": "$category",
                    "avg_price": { "$avg": "$price" },
                    "product_count": { "$sum": 1 },
                }
            },
            doc! { "$project": { "_id": 0, "category": "$_id", "avg_price": 1, "product_count": 1 } },
            doc! { "$sort": { "avg_price": -1 } },
        ]
    }

}

pub mod catalog_handler {
    use std::future::Future;

    use futures::TryStreamExt;
    use mongodb::bson::{self, doc, DateTime, Document};
    use mongodb::options::{ClientOptions, FindOptions};
    use mongodb::results::UpdateResult;
    use mongodb::{Client, Collection};
    use serde::de::DeserializeOwned;

    use super::pipelines;
    use crate::config::Config;
    use crate::error::Result;
    use crate::model::{CategoryPrice, NewReview, Product, ProductRating, ProductSummary};

    const APP_NAME: &str = "fleximart-catalog";

    /// One client and the catalog collection it serves.
    pub struct CatalogSession {
        client: Client,
        products: Collection<Product>,
    }

    impl CatalogSession {
        pub async fn connect(config: &Config) -> Result<CatalogSession> {
            let mut options = ClientOptions::parse(&config.uri).await?;
            options.app_name = Some(APP_NAME.to_string());
            let client = Client::with_options(options)?;

            if let Err(error) = client.database("admin").run_command(doc! { "ping": 1 }, None).await {
                client.shutdown().await;
                return Err(error.into());
            }
            log::info!("Connected to mongodb, using {}.{}", config.database, config.collection);

            let products = client
                .database(&config.database)
                .collection::<Product>(&config.collection);
            Ok(CatalogSession { client, products })
        }

        pub fn products(&self) -> Collection<Product> {
            self.products.clone()
        }

        pub async fn close(self) {
            let CatalogSession { client, products } = self;
            drop(products);
            client.shutdown().await;
            log::info!("Mongodb connection closed");
        }
    }

    /// Runs `op` against the catalog collection and closes the client
    /// afterwards, whatever `op` returned.
    pub async fn with_session<F, Fut, T>(config: &Config, op: F) -> Result<T>
    where
        F: FnOnce(Collection<Product>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let session = CatalogSession::connect(config).await?;
        let result = op(session.products()).await;
        if let Err(error) = &result {
            log::debug!("Operation failed, closing connection: {error}");
        }
        session.close().await;
        result
    }

    pub async fn find_by_category_under_price(
        products: &Collection<Product>,
        category: &str,
        price_ceiling: f64,
    ) -> Result<Vec<ProductSummary>> {
        let filter = pipelines::category_price_filter(category, price_ceiling);
        let options = FindOptions::builder()
            .projection(pipelines::summary_projection())
            .build();
        log::debug!("GET {:?}", filter);

        let cursor = products
            .clone_with_type::<ProductSummary>()
            .find(filter, options)
            .await?;
        let found: Vec<ProductSummary> = cursor.try_collect().await?;
        log::info!("{} products in {} under {}", found.len(), category, price_ceiling);
        Ok(found)
    }

    pub async fn high_rated_products(
        products: &Collection<Product>,
        min_rating: f64,
    ) -> Result<Vec<ProductRating>> {
        let rows = aggregate(products, pipelines::high_rating_pipeline(min_rating)).await?;
        log::info!("{} products rated {} or better", rows.len(), min_rating);
        Ok(rows)
    }

    /// Appends a review stamped with the current time. A missing product
    /// is not an error: the result simply reports nothing matched.
    pub async fn push_review(
        products: &Collection<Product>,
        product_id: &str,
        review: &NewReview,
    ) -> Result<UpdateResult> {
        let review = review.stamp(DateTime::now());
        let update = pipelines::push_review_update(bson::to_bson(&review)?);
        log::info!("PUT review from {} on {}", review.user, product_id);

        let update_result = products
            .update_one(pipelines::product_filter(product_id), update, None)
            .await?;
        log::info!("{:?}", update_result);
        if update_result.matched_count == 0 {
            log::warn!("No product with product_id {product_id}, review not added");
        }
        Ok(update_result)
    }

    pub async fn avg_price_by_category(products: &Collection<Product>) -> Result<Vec<CategoryPrice>> {
        let rows = aggregate(products, pipelines::category_price_pipeline()).await?;
        log::info!("{} categories", rows.len());
        Ok(rows)
    }

    async fn aggregate<T: DeserializeOwned>(
        products: &Collection<Product>,
        pipeline: Vec<Document>,
    ) -> Result<Vec<T>> {
        log::debug!("AGGREGATE {:?}", pipeline);
        let cursor = products.aggregate(pipeline, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        documents
            .into_iter()
            .map(|document| bson::from_document(document).map_err(Into::into))
            .collect()
    }
}
