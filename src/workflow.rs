use anyhow::{Context, Result};
use serde_json::json;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use crate::config::Config;
use crate::pipeline::ResearchPipeline;
use crate::pipeline::graph::RunTrace;
use crate::session::{HistoryEntry, Session};

/// 启动参数
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// 单次查询，`None` 时进入交互模式
    pub query: Option<String>,
    /// 以JSON输出运行结果
    pub json: bool,
}

/// 交互模式下的命令
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Ask(String),
    History,
    Clear,
    Quit,
    Empty,
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        "" => Command::Empty,
        ":history" => Command::History,
        ":clear" => Command::Clear,
        ":quit" | ":q" | ":exit" => Command::Quit,
        query => Command::Ask(query.to_string()),
    }
}

/// 格式化一次运行的结果
pub fn render_trace(trace: &RunTrace) -> String {
    let mut output = String::new();
    output.push_str("📜 最终答案:\n");
    output.push_str(trace.state.answer().unwrap_or_default());
    output.push_str("\n\n🧭 执行路径: ");
    output.push_str(&trace.visited.join(" → "));
    output.push('\n');

    for failure in &trace.failures {
        output.push_str(&format!("⚠️ {} 失败: {}\n", failure.node, failure.error));
    }

    output.push_str(&format!(
        "⏱️ 总耗时: {:.2}秒\n",
        trace.total_duration().as_secs_f64()
    ));
    output
}

fn trace_json(trace: &RunTrace) -> serde_json::Value {
    let failures: Vec<_> = trace
        .failures
        .iter()
        .map(|failure| json!({ "node": failure.node, "error": failure.error.to_string() }))
        .collect();

    json!({
        "run_id": trace.run_id.to_string(),
        "route": trace.route(),
        "visited": trace.visited,
        "failures": failures,
        "state": trace.state,
    })
}

/// 以JSON格式输出一次运行的结果
pub fn render_trace_json(trace: &RunTrace) -> Result<String> {
    Ok(serde_json::to_string_pretty(&trace_json(trace))?)
}

/// 终端输出
///
/// JSON 模式下标准输出只承载 JSON 文档，提示信息改走日志。
struct Console<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> Console<W> {
    fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        if self.json {
            info!("{}", message);
        } else {
            writeln!(self.out, "{}", message)?;
        }
        Ok(())
    }

    fn trace(&mut self, trace: &RunTrace, pretty: bool) -> Result<()> {
        if !self.json {
            writeln!(self.out, "{}", render_trace(trace))?;
        } else if pretty {
            writeln!(self.out, "{}", render_trace_json(trace)?)?;
        } else {
            writeln!(self.out, "{}", serde_json::to_string(&trace_json(trace))?)?;
        }
        Ok(())
    }

    fn history(&mut self, history: &[HistoryEntry]) -> Result<()> {
        if self.json {
            writeln!(self.out, "{}", serde_json::to_string(history)?)?;
            return Ok(());
        }
        if history.is_empty() {
            writeln!(self.out, "📭 暂无问答历史")?;
        }
        for (index, entry) in history.iter().enumerate() {
            writeln!(
                self.out,
                "[{}] Q: {}\n    A: {}\n",
                index + 1,
                entry.query,
                entry.answer
            )?;
        }
        Ok(())
    }
}

/// 启动研究流程
pub async fn launch(config: &Config, options: &LaunchOptions) -> Result<()> {
    let pipeline =
        ResearchPipeline::from_config(config).context("无法初始化研究流水线")?;
    let mut session = Session::new(pipeline);
    let mut console = Console::new(std::io::stdout(), options.json);

    match &options.query {
        Some(query) => answer_once(&mut session, query, &mut console).await,
        None => {
            let input = BufReader::new(tokio::io::stdin());
            run_interactive(&mut session, input, &mut console).await
        }
    }
}

/// 单次查询，JSON 模式下输出一个完整的 JSON 文档
async fn answer_once<W: Write>(
    session: &mut Session,
    query: &str,
    console: &mut Console<W>,
) -> Result<()> {
    console.notice(&format!("🔍 研究问题: {}", query))?;
    if let Some(trace) = session.ask(query).await? {
        console.trace(&trace, true)?;
    }
    Ok(())
}

/// 交互模式，JSON 模式下每个结果占一行
async fn run_interactive<R, W>(
    session: &mut Session,
    input: R,
    console: &mut Console<W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.notice(
        "🤖 DeepResearch 交互模式，输入问题开始研究（:history 查看历史，:clear 清空历史，:quit 退出）",
    )?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Empty => console.notice("⚠️ 请输入一个问题")?,
            Command::Quit => break,
            Command::Clear => {
                session.clear_history();
                console.notice("🧹 已清空问答历史")?;
            }
            Command::History => console.history(session.history())?,
            Command::Ask(query) => {
                console.notice(&format!("🔍 研究问题: {}", query))?;
                if let Some(trace) = session.ask(&query).await? {
                    console.trace(&trace, false)?;
                }
            }
        }
    }

    console.notice("👋 再见")?;
    Ok(())
}
