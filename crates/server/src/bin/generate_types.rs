use ts_rs::TS;

fn main() {
    let decls = [
        utils::response::ApiResponse::<()>::decl(),
        db::models::user::User::decl(),
        db::models::plant::LightNeeds::decl(),
        db::models::plant::Plant::decl(),
        db::models::plant::CreatePlant::decl(),
        db::models::plant::UpdatePlant::decl(),
        db::models::care_log::ActivityType::decl(),
        db::models::care_log::CareLog::decl(),
        db::models::care_log::CreateCareLog::decl(),
        db::models::reminder::ReminderType::decl(),
        db::models::reminder::Reminder::decl(),
        db::models::reminder::CreateReminder::decl(),
        db::models::ai_recommendation::AiRecommendation::decl(),
        services::services::watering::WateringStatus::decl(),
        services::services::watering::PlantWithStatus::decl(),
        services::services::calendar::CalendarDay::decl(),
        services::services::recommendation::GenerateRecommendation::decl(),
        server::routes::health::HealthStatus::decl(),
        server::routes::plants::FrequencySuggestion::decl(),
        server::routes::plants::CareInstructions::decl(),
    ];

    println!("// This file was generated by `generate_types`. Do not edit.\n");
    for decl in decls {
        println!("export {decl}\n");
    }
}
