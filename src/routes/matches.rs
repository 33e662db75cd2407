use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::MatchError;
use crate::models::{
    BulkMatchItem, BulkMatchQuery, BulkMatchResponse, ErrorResponse, FindCandidatesQuery,
    HealthResponse, MemberId, RecommendResponse, SingleMatchRequest,
};
use crate::services::{MatchService, MemberStore, Recommendation, ServiceError, SubjectRef};

/// Application state shared across all handlers
pub struct AppState<S> {
    pub service: Arc<MatchService<S>>,
}

impl<S> AppState<S> {
    pub fn new(service: MatchService<S>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Configure all match-related routes
pub fn configure<S: MemberStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check::<S>))
        .route("/members/{id}/candidates", web::get().to(find_candidates::<S>))
        .route("/matches/single", web::post().to(single_match::<S>))
        .route("/matches/bulk", web::get().to(bulk_match::<S>));
}

/// Health check endpoint
async fn health_check<S: MemberStore + 'static>(state: web::Data<AppState<S>>) -> impl Responder {
    let store_healthy = match state.service.store().health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Candidates for a member addressed by id
///
/// GET /api/v1/members/{id}/candidates?limit=20&cooldown_days=30
async fn find_candidates<S: MemberStore + 'static>(
    state: web::Data<AppState<S>>,
    path: web::Path<MemberId>,
    query: web::Query<FindCandidatesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let subject = SubjectRef::Id(path.into_inner());
    let limit = query.limit.map(usize::from);

    match state.service.recommend(&subject, limit, query.cooldown_days).await {
        Ok(recommendation) => HttpResponse::Ok().json(recommend_response(recommendation)),
        Err(e) => service_error(&e),
    }
}

/// Candidates for a member addressed by id or nickname
///
/// POST /api/v1/matches/single
///
/// With both `userId` and `nickname`, the nickname is used only when the id
/// matches no active member.
///
/// Request body:
/// ```json
/// {
///   "userId": 42,
///   "limit": 20,
///   "cooldownDays": 30
/// }
/// ```
async fn single_match<S: MemberStore + 'static>(
    state: web::Data<AppState<S>>,
    req: web::Json<SingleMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!(
            "Validation failed for single match request: userId={:?}, nickname={:?}",
            req.user_id,
            req.nickname
        );
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let Some(subject) = SubjectRef::from_parts(req.user_id, req.nickname) else {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "either userId or nickname is required".to_string(),
            status_code: 400,
        });
    };

    match state
        .service
        .recommend(&subject, req.limit.map(usize::from), req.cooldown_days)
        .await
    {
        Ok(recommendation) => HttpResponse::Ok().json(recommend_response(recommendation)),
        Err(e) => service_error(&e),
    }
}

/// Greedy one-candidate-per-member plan
///
/// GET /api/v1/matches/bulk?cooldown_days=30
///
/// Without `cooldown_days` the plan ignores presentation history.
async fn bulk_match<S: MemberStore + 'static>(
    state: web::Data<AppState<S>>,
    query: web::Query<BulkMatchQuery>,
) -> impl Responder {
    let plan = match state.service.plan_bulk(query.cooldown_days).await {
        Ok(plan) => plan,
        Err(e) => return service_error(&e),
    };

    let items: Vec<BulkMatchItem> = plan
        .assignments
        .iter()
        .map(|assignment| BulkMatchItem {
            for_user_id: assignment.subject_id,
            for_user_nickname: plan
                .nickname(assignment.subject_id)
                .unwrap_or_default()
                .to_string(),
            recommended_id: assignment.candidate_id,
            recommended_nickname: assignment
                .candidate_id
                .and_then(|id| plan.nickname(id))
                .map(str::to_string),
        })
        .collect();

    HttpResponse::Ok().json(BulkMatchResponse {
        assigned_count: plan.assigned_count(),
        items,
    })
}

fn recommend_response(recommendation: Recommendation) -> RecommendResponse {
    RecommendResponse {
        subject_id: recommendation.subject.id,
        nickname: recommendation.subject.nickname,
        candidates: recommendation.candidates,
        total_candidates: recommendation.total_candidates,
    }
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn service_error(err: &ServiceError) -> HttpResponse {
    match err {
        ServiceError::SubjectNotFound(subject) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Member not found".to_string(),
            message: format!("No active member with {}", subject),
            status_code: 404,
        }),
        ServiceError::Match(MatchError::InvalidLimit) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid limit".to_string(),
                message: err.to_string(),
                status_code: 400,
            })
        }
        ServiceError::Store(e) => {
            tracing::error!("Store failure while matching: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to load members".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
