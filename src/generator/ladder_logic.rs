// ==========================================
// 控制工程文档系统 - 结构化文本逻辑生成
// ==========================================
// 输出: IEC 61131-3 结构化文本模板
// 规则:
// - 声明区固定分组顺序 DI / DO / AI / AO，组内保持输入顺序
// - 逻辑区定时器编号从 0 开始，注释编号从 1 开始
// - 延时 > 0 优先于逻辑类型；NOT 取反；其余（含未知类型）直接赋值
// ==========================================

use crate::domain::{CauseEffectRule, IoPoint, IoType, ProjectMetadata};
use crate::generator::format_number;
use crate::generator::lookup::IoPointIndex;
use std::fmt::{self, Write};

const BANNER: &str = "(* ============================================ *)";

/// 生成结构化文本程序模板
///
/// 相同输入逐字节产出相同文本
pub fn generate_ladder_logic(
    meta: &ProjectMetadata,
    points: &[IoPoint],
    rules: &[CauseEffectRule],
) -> String {
    let mut out = String::new();
    // 写入 String 不会失败
    let _ = write_program(&mut out, meta, points, rules);
    out
}

fn write_program(
    out: &mut String,
    meta: &ProjectMetadata,
    points: &[IoPoint],
    rules: &[CauseEffectRule],
) -> fmt::Result {
    writeln!(out, "(* LADDER LOGIC TEMPLATE *)")?;
    writeln!(out, "(* Project: {} *)", meta.project_name)?;
    writeln!(out, "(* PLC Type: {} *)", meta.controller_type)?;
    writeln!(out, "(* Generated: {} *)\n", meta.generated_at)?;

    write_banner(out, "I/O DECLARATIONS")?;
    writeln!(out)?;
    write_declarations(out, points)?;

    writeln!(out)?;
    write_banner(out, "CONTROL LOGIC")?;
    writeln!(out)?;
    let index = IoPointIndex::new(points);
    for (i, rule) in rules.iter().enumerate() {
        write_rule(out, &index, i, rule)?;
    }

    write_banner(out, "END OF PROGRAM")
}

fn write_banner(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "{}", BANNER)?;
    writeln!(out, "(* {} *)", title)?;
    writeln!(out, "{}", BANNER)
}

fn write_declarations(out: &mut String, points: &[IoPoint]) -> fmt::Result {
    for (group, io_type) in IoType::ALL.into_iter().enumerate() {
        if group > 0 {
            writeln!(out)?;
        }
        writeln!(out, "(* {} *)", io_type.label())?;

        for point in points.iter().filter(|p| p.io_type == io_type) {
            if io_type.is_analog() {
                writeln!(
                    out,
                    "{} AT {} : REAL; (* {}, {}-{} {} *)",
                    point.tag_name,
                    point.address,
                    point.description,
                    format_number(point.range_min),
                    format_number(point.range_max),
                    point.engineering_units
                )?;
            } else {
                writeln!(
                    out,
                    "{} AT {} : BOOL; (* {} *)",
                    point.tag_name, point.address, point.description
                )?;
            }
        }
    }
    Ok(())
}

fn write_rule(
    out: &mut String,
    index: &IoPointIndex<'_>,
    i: usize,
    rule: &CauseEffectRule,
) -> fmt::Result {
    let cause = index.tag_of(&rule.cause_id);
    let effect = index.tag_of(&rule.effect_id);

    writeln!(out, "(* Logic {}: {} *)", i + 1, rule.description)?;
    writeln!(
        out,
        "(* {} -> {} *)",
        index.description_of(&rule.cause_id),
        index.description_of(&rule.effect_id)
    )?;

    if rule.has_delay() {
        writeln!(out, "TON_{} : TON;", i)?;
        writeln!(
            out,
            "TON_{}(IN:={}, PT:=T#{}s);",
            i,
            cause,
            format_number(rule.time_delay)
        )?;
        writeln!(out, "{} := TON_{}.Q;\n", effect, i)
    } else if rule.logic_type.is_negation() {
        writeln!(out, "{} := NOT {};\n", effect, cause)
    } else {
        writeln!(out, "{} := {};\n", effect, cause)
    }
}
