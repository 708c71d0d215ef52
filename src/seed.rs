//! Demo marketplace content: two clients, two workers, three jobs and one
//! application. Every demo account uses the password `12345`.

use chrono::{Duration, Utc};
use tracing::info;

use crate::api::application::models::Application;
use crate::api::auth::models::{Profile, Registration, User};
use crate::api::error::MarketError;
use crate::api::job::models::{Job, NewJob};
use crate::db::Repositories;

pub const DEMO_PASSWORD: &str = "12345";

/// What a seeding run inserted
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub jobs: usize,
    pub applications: usize,
}

struct DemoUser {
    id: &'static str,
    nombres: &'static str,
    cedula: &'static str,
    email: &'static str,
    profile: Profile,
}

fn demo_users() -> [DemoUser; 4] {
    [
        DemoUser {
            id: "user_juan_123",
            nombres: "Juan Pérez",
            cedula: "12345678",
            email: "juan@demo.com",
            profile: Profile::Cliente {
                direccion: "Calle 123 #45-67, Bogotá".into(),
                telefono: "3001234567".into(),
            },
        },
        DemoUser {
            id: "user_maria_456",
            nombres: "María Rodríguez",
            cedula: "87654321",
            email: "maria@demo.com",
            profile: Profile::Cliente {
                direccion: "Av. Siempre Viva 742".into(),
                telefono: "3109876543".into(),
            },
        },
        DemoUser {
            id: "worker_carlos_789",
            nombres: "Carlos Ruiz",
            cedula: "11223344",
            email: "carlos@demo.com",
            profile: Profile::Trabajador {
                cargo: "Electricista Certificado".into(),
                departamento: "Mantenimiento".into(),
            },
        },
        DemoUser {
            id: "worker_ana_012",
            nombres: "Ana Torres",
            cedula: "55667788",
            email: "ana@demo.com",
            profile: Profile::Trabajador {
                cargo: "Servicios de Limpieza".into(),
                departamento: "Hogar".into(),
            },
        },
    ]
}

/// Insert the demo content into empty collections
///
/// Users are only seeded when no user exists; jobs and the demo application
/// only when no job exists. Running it twice is a no-op.
pub async fn seed_demo_data(
    repositories: &Repositories,
    password_cost: u32,
) -> Result<SeedReport, MarketError> {
    let mut report = SeedReport::default();

    if repositories.users.count().await? == 0 {
        for demo in demo_users() {
            let registration = Registration {
                nombres: demo.nombres.to_string(),
                cedula: demo.cedula.to_string(),
                email: demo.email.to_string(),
                password: DEMO_PASSWORD.to_string(),
                profile: demo.profile,
            };
            let mut user = User::new(registration, password_cost).await?;
            user.id = demo.id.to_string();
            repositories.users.insert(&user).await?;
            report.users += 1;
        }
    }

    if repositories.jobs.list().await?.is_empty() {
        let jobs = demo_jobs(repositories).await?;
        // Inserting prepends, so go oldest first to end up newest first
        for job in jobs.iter().rev() {
            repositories.jobs.insert(job).await?;
            report.jobs += 1;
        }

        let worker = match report.jobs {
            0 => None,
            _ => repositories.users.find_by_id("worker_carlos_789").await?,
        };
        if let Some(worker) = worker {
            let mut application = Application::new(
                "job_1",
                &worker.public_view(),
                "Soy fontanero con 10 años de experiencia. Puedo ir hoy mismo por la tarde."
                    .to_string(),
            );
            application.id = "app_1".to_string();
            repositories.applications.insert(&application).await?;
            report.applications += 1;
        }
    }

    info!(
        "Demo data seeded: {} users, {} jobs, {} applications",
        report.users, report.jobs, report.applications
    );
    Ok(report)
}

/// Demo jobs in display order (newest first)
async fn demo_jobs(repositories: &Repositories) -> Result<Vec<Job>, MarketError> {
    let Some(juan) = repositories.users.find_by_id("user_juan_123").await? else {
        return Ok(Vec::new());
    };
    let Some(maria) = repositories.users.find_by_id("user_maria_456").await? else {
        return Ok(Vec::new());
    };
    let (juan, maria) = (juan.public_view(), maria.public_view());
    let now = Utc::now();

    let catalogue = [
        (
            "job_1",
            &juan,
            "Reparación de tubería baño principal",
            "Tengo una fuga persistente en el lavamanos del baño principal. Necesito a alguien con experiencia en fontanería para cambio de empaques y revisión general.",
            "Reparaciones",
            85000.0,
            "Bogotá, Chapinero",
            now - Duration::days(1),
        ),
        (
            "job_2",
            &juan,
            "Instalación de 3 ventiladores de techo",
            "Compré 3 ventiladores nuevos y necesito instalarlos en las habitaciones. Requiere conocimiento básico de electricidad y herramientas propias.",
            "Mecánica",
            150000.0,
            "Bogotá, Chapinero",
            now - Duration::days(2),
        ),
        (
            "job_3",
            &maria,
            "Limpieza profunda apartamento 3 habitaciones",
            "Busco apoyo para limpieza general de fin de mes. Incluye vidrios, cocina y baños. Se proporcionan los materiales.",
            "Limpieza",
            70000.0,
            "Bogotá, Kennedy",
            now,
        ),
    ];

    Ok(catalogue
        .into_iter()
        .map(
            |(id, owner, title, description, category, budget, location, published_at)| {
                let mut job = Job::new(
                    NewJob {
                        title: Some(title.to_string()),
                        description: Some(description.to_string()),
                        category: Some(category.to_string()),
                        budget,
                        location: Some(location.to_string()),
                    },
                    owner,
                );
                job.id = id.to_string();
                job.published_at = published_at;
                job
            },
        )
        .collect())
}
