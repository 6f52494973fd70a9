use hiring_ai::workflows::positions::domain::{CriterionId, KillerCriterionId};
use hiring_ai::workflows::positions::{
    EvaluationCriterion, KillerCriterion, Position, PositionId, PositionStatus,
};

struct Listing {
    id: &'static str,
    title: &'static str,
    location: &'static str,
    date: &'static str,
    status: PositionStatus,
    candidates: u32,
    contract_type: &'static str,
    salary: &'static str,
    description: &'static str,
    requirements: &'static [&'static str],
    criteria: &'static [(&'static str, &'static str, u8, &'static str)],
    killer_questions: &'static [(&'static str, &'static str)],
}

const LISTINGS: &[Listing] = &[
    Listing {
        id: "1",
        title: "Cocinero/a (40 horas turnos rotativos)",
        location: "Barcelona",
        date: "02/03/2025",
        status: PositionStatus::Active,
        candidates: 64,
        contract_type: "Indefinido",
        salary: "1.800€/mes",
        description: "Experienced cook for a Mediterranean restaurant working 40 hour rotating shifts.",
        requirements: &[
            "At least 2 years in a professional kitchen",
            "Knowledge of Mediterranean cooking techniques",
            "Available for rotating shifts",
            "Comfortable working in a team",
        ],
        criteria: &[
            ("exp-cocina", "Kitchen Experience", 40, "Years working in professional kitchens"),
            ("tecnicas", "Culinary Techniques", 30, "Command of basic and advanced techniques"),
            ("trabajo-equipo", "Teamwork", 30, "Collaborates well with the kitchen brigade"),
        ],
        killer_questions: &[
            ("disponibilidad", "Can you work rotating shifts including weekends?"),
            ("experiencia-min", "Do you have at least 2 years of professional kitchen experience?"),
        ],
    },
    Listing {
        id: "2",
        title: "Camarero/a (30 horas semanales/turnos rotativos)",
        location: "Barcelona",
        date: "28/02/2025",
        status: PositionStatus::Active,
        candidates: 302,
        contract_type: "Tiempo parcial",
        salary: "1.200€/mes",
        description: "Part-time floor staff for a busy dining room, 30 hours a week on rotating shifts.",
        requirements: &[
            "Previous experience serving tables",
            "Friendly and professional manner",
            "Available evenings and weekends",
        ],
        criteria: &[
            ("atencion", "Customer Service", 50, "Warm, attentive service"),
            ("experiencia", "Floor Experience", 30, "Time spent in similar venues"),
            ("idiomas", "Languages", 20, "English or other languages for tourists"),
        ],
        killer_questions: &[("fines-semana", "Are you available to work weekends?")],
    },
    Listing {
        id: "3",
        title: "Camarero (Barcelona)",
        location: "Barcelona",
        date: "01/03/2025",
        status: PositionStatus::Active,
        candidates: 4,
        contract_type: "Temporal",
        salary: "1.350€/mes",
        description: "Seasonal waiter for a terrace bar near the beach.",
        requirements: &["Experience on busy terraces", "Basic English"],
        criteria: &[
            ("rapidez", "Speed", 60, "Handles many tables at once"),
            ("idiomas", "Languages", 40, "Talks comfortably with tourists"),
        ],
        killer_questions: &[("permiso", "Do you hold a valid work permit for Spain?")],
    },
    Listing {
        id: "4",
        title: "Prueba Camarero/a",
        location: "Barcelona",
        date: "19/07/2025",
        status: PositionStatus::Active,
        candidates: 0,
        contract_type: "Prácticas",
        salary: "",
        description: "Trial listing for floor staff.",
        requirements: &[],
        criteria: &[],
        killer_questions: &[],
    },
    Listing {
        id: "5",
        title: "Hostess/Maître (Turno Noche)",
        location: "Madrid",
        date: "15/02/2025",
        status: PositionStatus::Paused,
        candidates: 23,
        contract_type: "Indefinido",
        salary: "1.700€/mes",
        description: "Front of house lead for the night shift of a fine dining restaurant.",
        requirements: &[
            "Experience managing reservations",
            "Excellent presentation and communication",
            "Fluent English",
        ],
        criteria: &[
            ("protocolo", "Hospitality Protocol", 40, "Greets and seats guests with care"),
            ("organizacion", "Organisation", 35, "Keeps the floor plan and bookings flowing"),
            ("idiomas", "Languages", 25, "Fluent English, French a plus"),
        ],
        killer_questions: &[("noche", "Can you work until 01:00 on weekdays?")],
    },
    Listing {
        id: "6",
        title: "Sous Chef",
        location: "Valencia",
        date: "10/02/2025",
        status: PositionStatus::Closed,
        candidates: 156,
        contract_type: "Indefinido",
        salary: "2.300€/mes",
        description: "Second in command of a kitchen serving modern Valencian cuisine.",
        requirements: &[
            "3+ years as chef de partie or sous chef",
            "Team leadership",
            "Cost control and ordering",
        ],
        criteria: &[
            ("liderazgo", "Leadership", 40, "Runs the pass and leads the brigade"),
            ("tecnica", "Technique", 35, "Modern and traditional Valencian dishes"),
            ("gestion", "Kitchen Management", 25, "Ordering, costing and stock"),
        ],
        killer_questions: &[
            ("experiencia", "Have you worked as sous chef before?"),
            ("manipulador", "Do you hold a food handler certificate?"),
        ],
    },
    Listing {
        id: "7",
        title: "Auxiliar de Limpieza (Restaurantes)",
        location: "Sevilla",
        date: "05/02/2025",
        status: PositionStatus::Paused,
        candidates: 89,
        contract_type: "Tiempo parcial",
        salary: "950€/mes",
        description: "Cleaning assistant for a group of restaurants in the city centre.",
        requirements: &["Attention to detail", "Early morning availability"],
        criteria: &[
            ("rigor", "Thoroughness", 60, "Follows cleaning checklists"),
            ("puntualidad", "Punctuality", 40, "Reliable early starts"),
        ],
        killer_questions: &[("madrugar", "Can you start at 06:00?")],
    },
    Listing {
        id: "8",
        title: "Chef de Partida - Parrilla",
        location: "Bilbao",
        date: "28/01/2025",
        status: PositionStatus::Closed,
        candidates: 45,
        contract_type: "Indefinido",
        salary: "1.900€/mes",
        description: "Grill station lead for a Basque steakhouse.",
        requirements: &["Charcoal grill experience", "Meat and fish butchery"],
        criteria: &[
            ("parrilla", "Grill Mastery", 60, "Cooks to point under pressure"),
            ("producto", "Product Knowledge", 40, "Cuts, ageing and fish"),
        ],
        killer_questions: &[("parrilla", "Have you run a grill station before?")],
    },
    Listing {
        id: "9",
        title: "Sommelier",
        location: "Barcelona",
        date: "20/01/2025",
        status: PositionStatus::Active,
        candidates: 12,
        contract_type: "Indefinido",
        salary: "2.000€/mes",
        description: "Sommelier to curate and serve the wine list of a tasting menu restaurant.",
        requirements: &["Sommelier certification", "Spanish and French wine knowledge"],
        criteria: &[
            ("cata", "Tasting", 50, "Describes and pairs wines confidently"),
            ("servicio", "Service", 50, "Table manner and upselling"),
        ],
        killer_questions: &[("certificado", "Do you hold a sommelier certification?")],
    },
    Listing {
        id: "10",
        title: "Barista - Cafetería Especializada",
        location: "Madrid",
        date: "12/01/2025",
        status: PositionStatus::Paused,
        candidates: 67,
        contract_type: "Tiempo parcial",
        salary: "1.100€/mes",
        description: "Barista for a speciality coffee shop with its own roastery.",
        requirements: &["Espresso and filter methods", "Latte art"],
        criteria: &[
            ("extraccion", "Extraction", 50, "Dialling in espresso"),
            ("atencion", "Customer Care", 50, "Explains origins to customers"),
        ],
        killer_questions: &[("horario", "Can you open the shop at 07:30?")],
    },
];

/// Sample positions shown on a fresh service, in list order.
pub(crate) fn seed_positions() -> Vec<Position> {
    LISTINGS.iter().map(Listing::to_position).collect()
}

impl Listing {
    fn to_position(&self) -> Position {
        Position {
            id: PositionId(self.id.to_string()),
            title: self.title.to_string(),
            location: self.location.to_string(),
            date: self.date.to_string(),
            status: self.status,
            candidate_count: self.candidates,
            description: self.description.to_string(),
            requirements: self.requirements.iter().map(|line| line.to_string()).collect(),
            criteria: self
                .criteria
                .iter()
                .map(|(id, name, weight, description)| EvaluationCriterion {
                    id: CriterionId(id.to_string()),
                    name: name.to_string(),
                    weight: *weight,
                    description: description.to_string(),
                })
                .collect(),
            killer_criteria: self
                .killer_questions
                .iter()
                .map(|(id, question)| KillerCriterion {
                    id: KillerCriterionId(id.to_string()),
                    question: question.to_string(),
                    required: true,
                })
                .collect(),
            contract_type: self.contract_type.to_string(),
            salary: self.salary.to_string(),
        }
    }
}
