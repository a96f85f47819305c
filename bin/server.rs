// Course Catalog - REST adapter
//
// Thin HTTP layer over the core data tier: path parsing, JSON bodies, and
// status-code mapping live here and nowhere else. Every successful mutation
// is followed by the matching catalog save; a failed save is logged by the
// core and does not fail the request (the in-memory mutation stands).

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{Months, NaiveDate, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use course_catalog::{Catalog, Config, Course, Instructor, Module, ReplaceOutcome, Student};

const DEFAULT_PORT: u16 = 8080;

#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

fn error_body(message: impl Into<String>) -> Json<serde_json::Value> {
    Json(json!({ "error": message.into() }))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("invalid date: {}", raw))
}

// ============================================================================
// Students
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentDto {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    enrollment_date: Option<String>,
}

async fn list_students(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.students().get_all())
}

async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.catalog.students().find_by_identity(&id) {
        Some(student) => (StatusCode::OK, Json(student)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            error_body(format!("Student not found: {}", id)),
        )
            .into_response(),
    }
}

async fn create_student(
    State(state): State<AppState>,
    Json(dto): Json<StudentDto>,
) -> impl IntoResponse {
    let email = match dto.email {
        Some(email) if !email.is_empty() => email,
        _ => return (StatusCode::BAD_REQUEST, error_body("email is required")).into_response(),
    };
    let enrollment_date = match dto.enrollment_date.as_deref() {
        Some(raw) => match parse_date(raw) {
            Ok(date) => date,
            Err(msg) => return (StatusCode::BAD_REQUEST, error_body(msg)).into_response(),
        },
        None => Utc::now().date_naive(),
    };

    let student = Student::new(
        dto.first_name.unwrap_or_default(),
        dto.last_name.unwrap_or_default(),
        email,
        enrollment_date,
    );

    if state.catalog.students().add(student.clone()) {
        let _ = state.catalog.save_students();
        (StatusCode::CREATED, Json(student)).into_response()
    } else {
        (
            StatusCode::CONFLICT,
            error_body(format!("Student already exists: {}", student.email)),
        )
            .into_response()
    }
}

async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<StudentDto>,
) -> impl IntoResponse {
    let enrollment_date = match dto.enrollment_date.as_deref().map(parse_date) {
        Some(Ok(date)) => Some(date),
        Some(Err(msg)) => return (StatusCode::BAD_REQUEST, error_body(msg)).into_response(),
        None => None,
    };

    let outcome = state.catalog.students().replace(&id, |existing| {
        Student::new(
            dto.first_name.clone().unwrap_or_else(|| existing.first_name.clone()),
            dto.last_name.clone().unwrap_or_else(|| existing.last_name.clone()),
            dto.email.clone().unwrap_or_else(|| existing.email.clone()),
            enrollment_date.unwrap_or(existing.enrollment_date),
        )
    });

    match outcome {
        ReplaceOutcome::Replaced(updated) => {
            let _ = state.catalog.save_students();
            (StatusCode::OK, Json(updated)).into_response()
        }
        ReplaceOutcome::NotFound => (
            StatusCode::NOT_FOUND,
            error_body(format!("Student not found: {}", id)),
        )
            .into_response(),
        ReplaceOutcome::Conflict => (
            StatusCode::CONFLICT,
            error_body("Another student already uses that email"),
        )
            .into_response(),
    }
}

async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if state.catalog.students().remove_by_identity(&id) {
        let _ = state.catalog.save_students();
        (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Student deleted".to_string(),
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            error_body(format!("Student not found: {}", id)),
        )
            .into_response()
    }
}

// ============================================================================
// Courses
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseDto {
    title: Option<String>,
    description: Option<String>,
    credits: Option<u32>,
    start_date: Option<String>,
}

async fn list_courses(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.courses().get_all())
}

async fn get_course(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.catalog.courses().find_by_identity(&id) {
        Some(course) => (StatusCode::OK, Json(course)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            error_body(format!("Course not found: {}", id)),
        )
            .into_response(),
    }
}

async fn create_course(
    State(state): State<AppState>,
    Json(dto): Json<CourseDto>,
) -> impl IntoResponse {
    let title = match dto.title {
        Some(title) if !title.is_empty() => title,
        _ => return (StatusCode::BAD_REQUEST, error_body("title is required")).into_response(),
    };
    let start_date = match dto.start_date.as_deref() {
        Some(raw) => match parse_date(raw) {
            Ok(date) => date,
            Err(msg) => return (StatusCode::BAD_REQUEST, error_body(msg)).into_response(),
        },
        // New courses default to starting one month out.
        None => Utc::now()
            .date_naive()
            .checked_add_months(Months::new(1))
            .unwrap_or_else(|| Utc::now().date_naive()),
    };

    let course = Course::new(
        title,
        dto.description.unwrap_or_default(),
        dto.credits.unwrap_or(1),
        start_date,
    );

    if state.catalog.courses().add(course.clone()) {
        let _ = state.catalog.save_courses();
        (StatusCode::CREATED, Json(course)).into_response()
    } else {
        (
            StatusCode::CONFLICT,
            error_body(format!("Course already exists: {}", course.title)),
        )
            .into_response()
    }
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<CourseDto>,
) -> impl IntoResponse {
    let start_date = match dto.start_date.as_deref().map(parse_date) {
        Some(Ok(date)) => Some(date),
        Some(Err(msg)) => return (StatusCode::BAD_REQUEST, error_body(msg)).into_response(),
        None => None,
    };

    let outcome = state.catalog.courses().replace(&id, |existing| {
        Course::new(
            dto.title.clone().unwrap_or_else(|| existing.title.clone()),
            dto.description.clone().unwrap_or_else(|| existing.description.clone()),
            dto.credits.unwrap_or(existing.credits),
            start_date.unwrap_or(existing.start_date),
        )
    });

    match outcome {
        ReplaceOutcome::Replaced(updated) => {
            let _ = state.catalog.save_courses();
            (StatusCode::OK, Json(updated)).into_response()
        }
        ReplaceOutcome::NotFound => (
            StatusCode::NOT_FOUND,
            error_body(format!("Course not found: {}", id)),
        )
            .into_response(),
        ReplaceOutcome::Conflict => (
            StatusCode::CONFLICT,
            error_body("Another course already uses that title"),
        )
            .into_response(),
    }
}

async fn delete_course(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    if state.catalog.courses().remove_by_identity(&id) {
        let _ = state.catalog.save_courses();
        (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Course deleted".to_string(),
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            error_body(format!("Course not found: {}", id)),
        )
            .into_response()
    }
}

// ============================================================================
// Instructors
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstructorDto {
    first_name: Option<String>,
    last_name: Option<String>,
    expertise: Option<u32>,
}

async fn list_instructors(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.instructors().get_all())
}

async fn get_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.catalog.instructors().find_by_identity(&id) {
        Some(instructor) => (StatusCode::OK, Json(instructor)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            error_body(format!("Instructor not found: {}", id)),
        )
            .into_response(),
    }
}

async fn create_instructor(
    State(state): State<AppState>,
    Json(dto): Json<InstructorDto>,
) -> impl IntoResponse {
    let (first_name, last_name) = match (dto.first_name, dto.last_name) {
        (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => (first, last),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                error_body("firstName and lastName are required"),
            )
                .into_response()
        }
    };

    let instructor = Instructor::new(first_name, last_name, dto.expertise.unwrap_or(1));

    if state.catalog.instructors().add(instructor.clone()) {
        let _ = state.catalog.save_instructors();
        (StatusCode::CREATED, Json(instructor)).into_response()
    } else {
        (
            StatusCode::CONFLICT,
            error_body(format!(
                "Instructor already exists: {} {}",
                instructor.first_name, instructor.last_name
            )),
        )
            .into_response()
    }
}

async fn update_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<InstructorDto>,
) -> impl IntoResponse {
    let outcome = state.catalog.instructors().replace(&id, |existing| {
        Instructor::new(
            dto.first_name.clone().unwrap_or_else(|| existing.first_name.clone()),
            dto.last_name.clone().unwrap_or_else(|| existing.last_name.clone()),
            dto.expertise.unwrap_or(existing.expertise),
        )
    });

    match outcome {
        ReplaceOutcome::Replaced(updated) => {
            let _ = state.catalog.save_instructors();
            (StatusCode::OK, Json(updated)).into_response()
        }
        ReplaceOutcome::NotFound => (
            StatusCode::NOT_FOUND,
            error_body(format!("Instructor not found: {}", id)),
        )
            .into_response(),
        ReplaceOutcome::Conflict => (
            StatusCode::CONFLICT,
            error_body("Another instructor already uses that name"),
        )
            .into_response(),
    }
}

async fn delete_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if state.catalog.instructors().remove_by_identity(&id) {
        let _ = state.catalog.save_instructors();
        (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Instructor deleted".to_string(),
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            error_body(format!("Instructor not found: {}", id)),
        )
            .into_response()
    }
}

// ============================================================================
// Modules
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleDto {
    title: Option<String>,
    content: Option<String>,
}

async fn list_modules(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.modules().get_all())
}

async fn get_module(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.catalog.modules().find_by_identity(&id) {
        Some(module) => (StatusCode::OK, Json(module)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            error_body(format!("Module not found: {}", id)),
        )
            .into_response(),
    }
}

async fn create_module(
    State(state): State<AppState>,
    Json(dto): Json<ModuleDto>,
) -> impl IntoResponse {
    let title = match dto.title {
        Some(title) if !title.is_empty() => title,
        _ => return (StatusCode::BAD_REQUEST, error_body("title is required")).into_response(),
    };

    let module = Module::new(title, dto.content.unwrap_or_default());

    if state.catalog.modules().add(module.clone()) {
        let _ = state.catalog.save_modules();
        (StatusCode::CREATED, Json(module)).into_response()
    } else {
        (
            StatusCode::CONFLICT,
            error_body(format!("Module already exists: {}", module.title)),
        )
            .into_response()
    }
}

async fn update_module(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<ModuleDto>,
) -> impl IntoResponse {
    let outcome = state.catalog.modules().replace(&id, |existing| {
        Module::new(
            dto.title.clone().unwrap_or_else(|| existing.title.clone()),
            dto.content.clone().unwrap_or_else(|| existing.content.clone()),
        )
    });

    match outcome {
        ReplaceOutcome::Replaced(updated) => {
            let _ = state.catalog.save_modules();
            (StatusCode::OK, Json(updated)).into_response()
        }
        ReplaceOutcome::NotFound => (
            StatusCode::NOT_FOUND,
            error_body(format!("Module not found: {}", id)),
        )
            .into_response(),
        ReplaceOutcome::Conflict => (
            StatusCode::CONFLICT,
            error_body("Another module already uses that title"),
        )
            .into_response(),
    }
}

async fn delete_module(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    if state.catalog.modules().remove_by_identity(&id) {
        let _ = state.catalog.save_modules();
        (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Module deleted".to_string(),
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            error_body(format!("Module not found: {}", id)),
        )
            .into_response()
    }
}

// ============================================================================
// Router & startup
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/students", get(list_students).post(create_student))
        .route(
            "/api/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/api/courses", get(list_courses).post(create_course))
        .route(
            "/api/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route(
            "/api/instructors",
            get(list_instructors).post(create_instructor),
        )
        .route(
            "/api/instructors/:id",
            get(get_instructor)
                .put(update_instructor)
                .delete(delete_instructor),
        )
        .route("/api/modules", get(list_modules).post(create_module))
        .route(
            "/api/modules/:id",
            get(get_module).put(update_module).delete(delete_module),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let port = std::env::args()
        .nth(1)
        .and_then(|arg| match arg.parse() {
            Ok(port) => Some(port),
            Err(_) => {
                warn!("invalid port '{}', using default {}", arg, DEFAULT_PORT);
                None
            }
        })
        .unwrap_or(DEFAULT_PORT);

    // The catalog is built exactly once, here; everything else borrows it.
    let (catalog, report) = Catalog::bootstrap(Config::from_env());
    if !report.all_succeeded() {
        for failure in report.failures() {
            warn!(
                "serving with empty '{}' store: {}",
                failure.name,
                failure.result.as_ref().unwrap_err()
            );
        }
    }

    let state = AppState {
        catalog: Arc::new(catalog),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("catalog server listening on http://{}", addr);
    info!("  students:    http://localhost:{}/api/students", port);
    info!("  courses:     http://localhost:{}/api/courses", port);
    info!("  instructors: http://localhost:{}/api/instructors", port);
    info!("  modules:     http://localhost:{}/api/modules", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
