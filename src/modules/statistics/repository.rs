use crate::{api::error, modules::statistics::schema::StatisticsOverview};

#[async_trait::async_trait]
pub trait StatisticsRepository {
    /// All figures come from one snapshot. Groups with no rows are omitted.
    async fn overview(&self) -> Result<StatisticsOverview, error::SystemError>;
}
