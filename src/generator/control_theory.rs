// ==========================================
// 控制工程文档系统 - 控制说明文档生成
// ==========================================
// 章节: 抬头 / 系统概述 / I/O 汇总 / 控制逻辑描述 / 安全注意事项
// 规则按给定顺序编号（从 1 开始），悬空引用渲染为空串
// ==========================================

use crate::domain::{CauseEffectRule, IoPoint, IoType, ProjectMetadata};
use crate::generator::format_number;
use crate::generator::lookup::IoPointIndex;
use std::fmt::{self, Write};

const SEPARATOR_WIDTH: usize = 80;

const SAFETY_CONSIDERATIONS: [&str; 3] = [
    "All interlocks should be verified before commissioning",
    "Emergency stop functions must override all normal operations",
    "Critical alarms should be logged and require acknowledgment",
];

/// 生成控制说明文档
///
/// # 参数
/// - meta: 项目名称、控制器类型、已渲染的生成时间
/// - points: 项目 I/O 点快照
/// - rules: 项目因果规则快照（按创建顺序）
pub fn generate_control_theory(
    meta: &ProjectMetadata,
    points: &[IoPoint],
    rules: &[CauseEffectRule],
) -> String {
    let mut out = String::new();
    // 写入 String 不会失败
    let _ = write_document(&mut out, meta, points, rules);
    out
}

fn write_document(
    out: &mut String,
    meta: &ProjectMetadata,
    points: &[IoPoint],
    rules: &[CauseEffectRule],
) -> fmt::Result {
    writeln!(out, "CONTROL THEORY DOCUMENT")?;
    writeln!(out, "Project: {}", meta.project_name)?;
    writeln!(out, "PLC Type: {}", meta.controller_type)?;
    writeln!(out, "Generated: {}", meta.generated_at)?;
    write!(out, "\n{}\n\n", "=".repeat(SEPARATOR_WIDTH))?;

    writeln!(out, "1. SYSTEM OVERVIEW\n")?;
    writeln!(
        out,
        "This control system manages {} I/O points with {} cause-effect relationships.\n",
        points.len(),
        rules.len()
    )?;

    writeln!(out, "2. INPUT/OUTPUT SUMMARY\n")?;
    for io_type in IoType::ALL {
        let count = points.iter().filter(|p| p.io_type == io_type).count();
        writeln!(out, "{} ({}): {}", io_type.label(), io_type.as_str(), count)?;
    }
    writeln!(out)?;

    writeln!(out, "3. CONTROL LOGIC DESCRIPTION\n")?;
    let index = IoPointIndex::new(points);
    for (i, rule) in rules.iter().enumerate() {
        writeln!(out, "Logic {}:", i + 1)?;
        writeln!(
            out,
            "  Cause: {} ({})",
            index.tag_of(&rule.cause_id),
            index.description_of(&rule.cause_id)
        )?;
        writeln!(
            out,
            "  Effect: {} ({})",
            index.tag_of(&rule.effect_id),
            index.description_of(&rule.effect_id)
        )?;
        writeln!(out, "  Logic Type: {}", rule.logic_type)?;
        writeln!(out, "  Time Delay: {}s", format_number(rule.time_delay))?;
        writeln!(out, "  Priority: {}", rule.priority)?;
        writeln!(out, "  Description: {}\n", rule.description)?;
    }

    writeln!(out, "4. SAFETY CONSIDERATIONS\n")?;
    for line in SAFETY_CONSIDERATIONS {
        writeln!(out, "- {}", line)?;
    }
    writeln!(out)?;

    Ok(())
}
