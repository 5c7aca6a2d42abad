use actix_web::{get, web};

use crate::{
    api::{error, success},
    modules::statistics::{
        repository_pg::StatisticsRepositoryPg, schema::StatisticsOverview,
        service::StatisticsService,
    },
};

pub type StatisticsSvc = StatisticsService<StatisticsRepositoryPg>;

#[get("")]
pub async fn get_statistics(
    statistics_service: web::Data<StatisticsSvc>,
) -> Result<success::Success<StatisticsOverview>, error::Error> {
    let overview = statistics_service.overview().await?;
    Ok(success::Success::ok(Some(overview)).message("Statistics retrieved successfully"))
}
