use leptos::prelude::*;

use crate::app::AboutOpen;

/// Partner institution shown on the about panel.
struct Institution {
    name: &'static str,
    logo: &'static str,
    alt: &'static str,
}

const INSTITUTIONS: [Institution; 4] = [
    Institution {
        name: "Universidad Nacional de La Plata",
        logo: "https://unlp.edu.ar/wp-content/uploads/2023/06/Identidad-UNLP-1.png",
        alt: "Logo UNLP",
    },
    Institution {
        name: "Facultad de Arquitectura y Urbanismo",
        logo: "https://ciut.fau.unlp.edu.ar/wp-content/uploads/sites/33/elementor/thumbs/LOGO-FAU-recortado-qjf1cejysoaa71ckprs137f87b0uf6zf35uvw13f28.png",
        alt: "Logo FAU",
    },
    Institution {
        name: "Facultad de Ingeniería Hidráulica",
        logo: "https://ing.unlp.edu.ar/wp-content/uploads/2022/10/logo.png",
        alt: "Logo Ingeniería Hidráulica",
    },
    Institution {
        name: "Centro de Investigaciones Urbanas y Territoriales (CIUT)",
        logo: "https://ciut.fau.unlp.edu.ar/wp-content/uploads/sites/33/elementor/thumbs/LOGO-ciut--qjf1cejyso9ssxlxj3wfu5ypvjc9u6swvp6q60jpj4.png",
        alt: "Logo CIUT",
    },
];

const OBJECTIVE: [&str; 2] = [
    "Este dashboard tiene como objetivo proporcionar una herramienta interactiva para visualizar y analizar las zonas de riesgo hídrico en La Plata. La plataforma permite a usuarios, investigadores y tomadores de decisiones explorar de manera intuitiva la información geoespacial relacionada con inundaciones y riesgo hídrico en la ciudad.",
    "A través de capas interactivas, los usuarios pueden examinar tanto las zonas de riesgo como la infraestructura urbana, facilitando una mejor comprensión de la vulnerabilidad territorial ante eventos de inundación.",
];

const DATA_LAYERS: [&str; 3] = [
    "Zonas de riesgo hídrico clasificadas por nivel de amenaza",
    "Huellas de edificaciones y infraestructura urbana",
    "Cartografía base actualizada de La Plata",
];

const PILOT_NOTICE: &str = "Este es un proyecto piloto en desarrollo. Los datos y visualizaciones presentados son preliminares y están sujetos a revisión y mejoras continuas.";

const CONTACT: &str = "Este proyecto es resultado de la colaboración interdisciplinaria entre la Facultad de Arquitectura y Urbanismo y la Facultad de Ingeniería Hidráulica de la Universidad Nacional de La Plata. Para más información sobre el proyecto o oportunidades de colaboración, contacte a las instituciones participantes.";

const SECTION_TITLE: &str = "margin: 28px 0 12px; font-size: 1.25rem; font-weight: 600; color: #0f172a;";
const PARAGRAPH: &str = "margin: 0 0 12px; font-size: 0.95rem; line-height: 1.6; color: #334155;";

/// "Acerca del Proyecto" page drawn over the dashboard. The map stays mounted underneath.
#[component]
pub fn AboutPanel() -> impl IntoView {
    let AboutOpen(open) = expect_context();

    view! {
        <div
            class="scrollbar-thin"
            style="position: fixed; inset: 0; z-index: 900; overflow-y: auto; background: #ffffff;"
        >
            <header style="border-bottom: 1px solid #e2e8f0; padding: 14px 16px;">
                <button
                    style="display: inline-flex; align-items: center; gap: 8px; padding: 6px 10px; border-radius: 6px; border: none; background: none; cursor: pointer; font-size: 0.85rem; font-weight: 500; color: #0f172a;"
                    on:click=move |_| open.set(false)
                >
                    "\u{2190} Volver al Dashboard"
                </button>
            </header>
            <main style="max-width: 860px; margin: 0 auto; padding: 24px 16px 48px;">
                <h1 style="margin: 0 0 24px; font-size: 2rem; font-weight: 700; color: #0f172a;">"Acerca del Proyecto"</h1>

                <div style="padding: 14px 18px; border-left: 4px solid #facc15; background: #fefce8;">
                    <p style="margin: 0; font-size: 0.85rem; font-weight: 600; color: #a16207;">"\u{26A0} PROYECTO PILOTO"</p>
                    <p style="margin: 6px 0 0; font-size: 0.85rem; color: #a16207;">{PILOT_NOTICE}</p>
                </div>

                <h2 style=SECTION_TITLE>"Objetivo del Proyecto"</h2>
                {OBJECTIVE
                    .into_iter()
                    .map(|text| view! { <p style=PARAGRAPH>{text}</p> })
                    .collect_view()}

                <h2 style=SECTION_TITLE>"Instituciones Colaboradoras"</h2>
                <div style="display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 24px;">
                    {INSTITUTIONS
                        .iter()
                        .map(|institution| view! {
                            <div style="text-align: center;">
                                <img
                                    src=institution.logo
                                    alt=institution.alt
                                    style="height: 64px; max-width: 100%; object-fit: contain;"
                                />
                                <h3 style="margin: 12px 0 0; font-size: 1rem; font-weight: 600; color: #0f172a;">{institution.name}</h3>
                            </div>
                        })
                        .collect_view()}
                </div>

                <h2 style=SECTION_TITLE>"Metodología y Datos"</h2>
                <p style=PARAGRAPH>
                    "El proyecto integra datos geoespaciales de múltiples fuentes para crear una representación comprensiva del riesgo hídrico urbano. Las capas de información incluyen:"
                </p>
                <ul style="margin: 0 0 12px; padding-left: 22px; font-size: 0.95rem; line-height: 1.8; color: #334155;">
                    {DATA_LAYERS
                        .into_iter()
                        .map(|item| view! { <li>{item}</li> })
                        .collect_view()}
                </ul>

                <h2 style=SECTION_TITLE>"Contacto y Colaboración"</h2>
                <p style=PARAGRAPH>{CONTACT}</p>
            </main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_partner_institution_once() {
        let names: Vec<&str> = INSTITUTIONS.iter().map(|i| i.name).collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"Universidad Nacional de La Plata"));
        assert!(names.contains(&"Centro de Investigaciones Urbanas y Territoriales (CIUT)"));
        for (i, name) in names.iter().enumerate() {
            assert!(!names[i + 1..].contains(name), "{name} listed twice");
        }
    }

    #[test]
    fn logos_are_served_over_https() {
        for institution in &INSTITUTIONS {
            assert!(institution.logo.starts_with("https://"), "{}", institution.alt);
        }
    }
}
