use crate::models::{EducationEntry, ExperienceEntry, Profile};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Fixed profile returned by the simulated analyzer.
pub(crate) fn sample_profile() -> Profile {
    Profile {
        name: "Morgan Ellery".to_string(),
        email: "morgan.ellery@example.com".to_string(),
        phone: Some("555-010-2471".to_string()),
        summary: Some(
            "Backend engineer with six years of experience building payment and \
             data-ingestion services in Rust and Go. Enjoys turning flaky pipelines \
             into boring, observable systems."
                .to_string(),
        ),
        skills: strings(&[
            "Rust",
            "Go",
            "PostgreSQL",
            "Kafka",
            "gRPC",
            "Kubernetes",
            "Terraform",
            "Observability",
        ]),
        experience: vec![
            ExperienceEntry {
                company: "Ledgerline Payments".to_string(),
                title: "Senior Backend Engineer".to_string(),
                duration: "2021 - Present".to_string(),
                description: strings(&[
                    "Rebuilt the settlement pipeline in Rust, cutting nightly batch time from 3h to 25m",
                    "Led a four-person team through a zero-downtime PostgreSQL major-version upgrade",
                    "Introduced tracing-based SLO dashboards adopted by six other teams",
                ]),
            },
            ExperienceEntry {
                company: "Streamhaus".to_string(),
                title: "Software Engineer".to_string(),
                duration: "2018 - 2021".to_string(),
                description: strings(&[
                    "Built Kafka consumers ingesting 40k events per second for analytics",
                    "Migrated REST services to gRPC with backwards-compatible gateways",
                ]),
            },
        ],
        education: vec![EducationEntry {
            institution: "Northfield Institute of Technology".to_string(),
            degree: "BSc Computer Engineering".to_string(),
            year: "2018".to_string(),
        }],
        strengths: strings(&[
            "Deep experience with high-throughput data pipelines",
            "Strong production debugging and observability practice",
            "Has led small teams through risky migrations",
        ]),
        weaknesses: strings(&[
            "Little frontend or mobile experience",
            "No formal people-management role yet",
        ]),
        missing_skills: Some(strings(&["System design interviews", "AWS", "Python"])),
    }
}
