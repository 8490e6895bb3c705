//! Generation prompt, rendered from the same [`TaskGrammar`] the parser uses.

use crate::parser::TaskGrammar;

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptOptions {
    /// Ask for a per-task project line.
    pub with_project: bool,
}

const RULES_HEADER: &str = "Eres un asistente que organiza y planifica tareas en un formato texto estructurado.\n\nReglas:\n\nCada tarea debe llevar:\n";

const RULES_FOOTER: &str = "\
Si hay varias tareas relacionadas, identifica una Tarea Padre y enumera las subtareas (hijos) como Tarea 1.1, 1.2, etc.
Cada hijo debe tener sus propias propiedades completas (Titulo, Descripcion, Criterios de aceptación, Priority, Tags).
Si el usuario pide varias cosas sin relación, organízalas en varias tareas padre separadas.
La salida debe ser texto plano (con títulos, subtítulos y bullets como en un documento).
El tono debe ser claro, accionable y técnico.
";

fn example_child(g: &TaskGrammar, number: &str, opts: PromptOptions, out: &mut String) {
    out.push_str(&format!(
        "{} {} {} [Título del hijo]\n",
        g.canonical_child_marker(),
        number,
        g.canonical_separator()
    ));
    if opts.with_project {
        out.push_str(&format!("{} [Nombre del proyecto]\n", g.canonical_project_label()));
    }
    out.push_str(&format!("{}\n[...]\n\n", g.canonical_description_label()));
    out.push_str(&format!("{}\n", g.canonical_criteria_label()));
    out.push_str("- Given [...] When [...] Then [...]\n");
    out.push_str("- Given [...] When [...] Then [...]\n\n");
}

/// Renders the full instruction prompt around the user's free text.
pub fn render_prompt(grammar: &TaskGrammar, user_text: &str, opts: PromptOptions) -> String {
    let g = grammar;
    let mut out = String::with_capacity(2048 + user_text.len());

    out.push_str(RULES_HEADER);
    if opts.with_project {
        out.push_str("- Proyecto: nombre del proyecto al que pertenece (detecta o infiere del contexto, ej: \"Sistema de Pagos\", \"App Mobile\", \"Backend API\").\n");
    }
    out.push_str("- Titulo (≤70 caracteres, claro y directo).\n");
    out.push_str("- Descripcion: detallada, con contexto técnico, lo que se debe lograr y pasos clave.\n");
    out.push_str("- Criterios de aceptación: en formato Given/When/Then, mínimo 2 y máximo 5.\n");
    out.push_str("- Priority: urgent | high | medium | low.\n");
    out.push_str("- Tags: entre 3–6 en kebab-case (ej: frontend, strapi, n8n, ux-ui, api, render, vercel, video-tools, ai-automation).\n\n");
    out.push_str(RULES_FOOTER);
    out.push_str("\nFormato de salida esperado:\n\n");

    out.push_str(&format!(
        "{} 1: [Nombre de la tarea padre]\n\n",
        g.canonical_parent_marker()
    ));

    example_child(g, "1.1", opts, &mut out);
    out.push_str(&format!("{} high\n", g.canonical_priority_label()));
    out.push_str(&format!("{} frontend, strapi, ux-ui\n\n---\n\n", g.canonical_tags_label()));

    example_child(g, "1.2", opts, &mut out);
    out.push_str(&format!("{} medium\n", g.canonical_priority_label()));
    out.push_str(&format!("{} n8n, api, automation\n\n---\n\n", g.canonical_tags_label()));

    out.push_str("Texto del usuario:\n");
    out.push_str(user_text.trim());
    out.push('\n');
    out
}
