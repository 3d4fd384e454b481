//! Fixed renderers that replace or extend the generic item list for
//! specific topics: the RACI role matrix, the Ishikawa cause/effect
//! diagram and the quality donut chart.

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::chart::ChartKind;
use crate::chart::ChartSpec;
use crate::chart::LegendPosition;
use crate::chart::Rgb;
use crate::chart::TooltipContext;

/// Responsibility roles in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Responsible,
    Accountable,
    Consulted,
    Informed,
}

impl Role {
    pub fn letter(self) -> char {
        match self {
            Role::Responsible => 'R',
            Role::Accountable => 'A',
            Role::Consulted => 'C',
            Role::Informed => 'I',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Responsible => "Responsible (Responsável)",
            Role::Accountable => "Accountable (Aprovador)",
            Role::Consulted => "Consulted (Consultado)",
            Role::Informed => "Informed (Informado)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Role::Responsible => "Quem executa a tarefa.",
            Role::Accountable => "O único responsável final pela tarefa.",
            Role::Consulted => "Quem deve ser consultado (comunicação bidirecional).",
            Role::Informed => "Quem deve ser mantido informado (comunicação unidirecional).",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRow {
    pub role: Role,
    pub badge: char,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleMatrix {
    pub headers: [String; 2],
    pub rows: Vec<RoleRow>,
}

pub fn role_matrix() -> RoleMatrix {
    RoleMatrix {
        headers: ["Papel".to_string(), "Descrição".to_string()],
        rows: Role::iter()
            .map(|role| RoleRow {
                role,
                badge: role.letter(),
                name: role.name().to_string(),
                description: role.description().to_string(),
            })
            .collect(),
    }
}

/// The six Ishikawa categories; the first three branch above the spine,
/// the last three below.
pub const CAUSE_CATEGORIES: [&str; 6] = [
    "Método",
    "Máquina",
    "Mão de Obra",
    "Material",
    "Medição",
    "Meio Ambiente",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CauseEffectDiagram {
    pub intro: String,
    pub effect: String,
    pub effect_caption: String,
    pub top: [String; 3],
    pub bottom: [String; 3],
}

impl CauseEffectDiagram {
    /// All category labels, top row first.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.top.iter().chain(self.bottom.iter()).map(String::as_str)
    }
}

pub fn cause_effect_diagram(intro: &str) -> CauseEffectDiagram {
    let [a, b, c, d, e, f] = CAUSE_CATEGORIES.map(str::to_string);
    CauseEffectDiagram {
        intro: intro.to_string(),
        effect: "Efeito".to_string(),
        effect_caption: "(Problema)".to_string(),
        top: [a, b, c],
        bottom: [d, e, f],
    }
}

pub const QUALITY_CHART_MOUNT: &str = "quality-chart";

pub const QUALITY_LABELS: [&str; 3] = ["Planejamento", "Garantia (QA)", "Controle (QC)"];

const QUALITY_COLORS: [Rgb; 3] = [
    Rgb(0x38, 0xbd, 0xf8),
    Rgb(0x0e, 0xa5, 0xe9),
    Rgb(0x02, 0x84, 0xc7),
];

/// Wedge values carry no information; they only size equal slices, so
/// the tooltip shows the category alone.
fn label_only(ctx: &TooltipContext<'_>) -> String {
    ctx.label.to_string()
}

pub fn quality_chart_spec() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Doughnut,
        title: "Componentes da Gestão da Qualidade".to_string(),
        title_font_size: 16,
        dataset_label: "Componentes da Qualidade".to_string(),
        labels: QUALITY_LABELS.map(str::to_string).to_vec(),
        values: vec![1.0; QUALITY_LABELS.len()],
        colors: QUALITY_COLORS.to_vec(),
        border_color: Rgb::WHITE,
        border_width: 4,
        legend: LegendPosition::Top,
        tooltip_label: label_only,
    }
}
