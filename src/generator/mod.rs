// ==========================================
// 控制工程文档系统 - 生成层
// ==========================================
// 职责: 项目快照 → 文本生成物（控制说明 / 结构化文本 / 导出表格）
// 红线: 纯函数，不访问存储，不读取时钟
// ==========================================

pub mod control_theory;
pub mod error;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ladder_logic;
pub mod lookup;
pub mod table_export;

pub use control_theory::generate_control_theory;
pub use error::{ExportError, ExportResult};
pub use ladder_logic::generate_ladder_logic;
pub use lookup::IoPointIndex;
pub use table_export::{
    export_network_topology, export_project_tables, render_cause_effect_section,
    render_io_section,
};

/// 数值渲染：整数值不带小数部分，-0 渲染为 0
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}
