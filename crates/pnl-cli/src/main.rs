//! 손익 대시보드 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 요약 지표
//! pnl summary --file-name orders.csv
//!
//! # 누적 손익 차트 데이터 (JSON)
//! pnl chart --kind cumulative --format json
//!
//! # 2024년 3월 캘린더
//! pnl calendar --month 2024-03
//!
//! # 전체 대시보드
//! pnl --base-url http://localhost:5000 dashboard
//! ```

use std::sync::Arc;

use clap::{Parser, Subcommand};
use pnl_cli::commands::{
    calendar::{run_calendar, CalendarConfig},
    chart::{run_chart, ChartConfig},
    dashboard::{run_dashboard, DashboardConfig},
    parse_month,
    summary::run_summary,
    OutputFormat,
};
use pnl_client::{FetcherConfig, PnlFetcher, ReportSource, SharedRequestCache};
use pnl_core::{init_logging, AppConfig, LogConfig, SeriesKind};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pnl")]
#[command(about = "P&L dashboard CLI - 거래 손익 요약, 차트, 캘린더", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (없으면 기본값과 환경 변수 사용)
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    /// API 기본 URL (설정 파일보다 우선)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// 조회할 거래 파일 이름 (설정 파일보다 우선)
    #[arg(long, global = true)]
    file_name: Option<String>,

    /// 출력 형식 (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 요약 지표 (총 손익, 평균 수익/손실, 계약 수, Profit Factor)
    Summary,

    /// 시계열 차트 데이터
    Chart {
        /// 시리즈 종류 (cumulative, by_day)
        #[arg(short, long, default_value = "cumulative")]
        kind: String,
    },

    /// 월 캘린더
    Calendar {
        /// 표시할 월 (YYYY-MM, 기본: 데이터의 마지막 월)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// 전체 대시보드
    Dashboard {
        /// 캘린더에 표시할 월 (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(file_name) = cli.file_name {
        config.api.file_name = file_name;
    }

    // 트레이싱 초기화
    init_logging(LogConfig::from_settings(&config.logging))?;

    let format = OutputFormat::parse(&cli.format)?;

    let fetcher = PnlFetcher::new(FetcherConfig::from_settings(&config.api))?;
    info!(
        endpoint = %fetcher.endpoint(),
        file_name = %config.api.file_name,
        "P&L source configured"
    );

    let cache = SharedRequestCache::new(Arc::new(fetcher)).with_ttl(config.cache.ttl());
    let source: Arc<dyn ReportSource> = Arc::new(cache);

    let result = match cli.command {
        Commands::Summary => run_summary(source, format).await,

        Commands::Chart { kind } => {
            let kind: SeriesKind = kind.parse()?;
            run_chart(source, ChartConfig { kind, format }).await
        }

        Commands::Calendar { month } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            run_calendar(source, CalendarConfig { month, format }).await
        }

        Commands::Dashboard { month } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            run_dashboard(source, DashboardConfig { month, format }).await
        }
    };

    match result {
        Ok(content) => {
            println!("{}", content);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            Err(e.into())
        }
    }
}
