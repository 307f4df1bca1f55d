//! 가치투자 스크리너 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 원시 테이블 수집 (디렉토리의 <id>.json 파일들)
//! screener ingest -i raw/
//!
//! # 파싱 불가 셀을 결측으로 강등하며 재수집
//! screener ingest -i raw/1930.json --coerce
//!
//! # 스냅샷 감사 및 오류 장부 기록
//! screener audit --mark
//!
//! # 스냅샷 수동 재라벨링
//! screener repair -i 1930 -y 2015 -f eps -v 1.25
//!
//! # 스크리닝 실행
//! screener screen -u data/universe.json -p data/prices.json
//! ```

use clap::{Parser, Subcommand};
use tracing::error;

mod commands;

use commands::audit::audit;
use commands::ingest::{ingest, IngestConfig};
use commands::list_missing::list_missing;
use commands::repair::{repair, RepairConfig};
use commands::screen::{screen, ScreenConfig};
use screener_core::{init_logging, AppConfig};

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "Stock screener CLI - 방어투자자 기준 저평가 종목 스크리닝", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 작업 집합 전체를 스크리닝하고 보고서 출력
    Screen {
        /// 유니버스 파일 (JSON: [{"id", "name", "symbol"}])
        #[arg(short, long)]
        universe: String,

        /// 가격 파일 (JSON: {"<id>": price})
        #[arg(short, long)]
        prices: String,

        /// 보고서 JSON 저장 경로 (지정하지 않으면 텍스트만 출력)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 원시 테이블 JSON을 정합화해 저장소에 기록
    Ingest {
        /// 원시 테이블 파일 또는 디렉토리 (<회사ID>.json)
        #[arg(short, long)]
        input: String,

        /// 파싱 불가 셀을 에러 대신 결측으로 강등
        #[arg(long, default_value = "false")]
        coerce: bool,
    },

    /// 저장된 스냅샷 감사 (엄격한 컬럼 검증 + 불변식 확인)
    Audit {
        /// 불변식 위반 회사를 오류 장부에 기록
        #[arg(long, default_value = "false")]
        mark: bool,
    },

    /// 스냅샷 수동 재라벨링
    Repair {
        /// 회사 식별자
        #[arg(short, long)]
        id: String,

        /// 회계연도
        #[arg(short, long)]
        year: i32,

        /// 필드 (eps, dividend, pb, pe, turnover, nca, current_ratio 또는 컬럼 라벨)
        #[arg(short, long)]
        field: String,

        /// 새 값 (생략하면 결측 처리)
        #[arg(short, long)]
        value: Option<String>,
    },

    /// 스냅샷이 없는 회사 나열
    ListMissing {
        /// 유니버스 파일 (JSON)
        #[arg(short, long)]
        universe: String,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 설정 파일이 없으면 기본값으로 동작
    let app_config = if std::path::Path::new(&cli.config).exists() {
        match AppConfig::load(&cli.config) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("설정 로드 실패 ({}): {}", cli.config, err);
                std::process::exit(1);
            }
        }
    } else {
        AppConfig::default()
    };

    if let Err(err) = init_logging(&app_config.logging) {
        eprintln!("로깅 초기화 실패: {}", err);
    }

    let result = match cli.command {
        Commands::Screen {
            universe,
            prices,
            output,
        } => screen(
            &app_config,
            ScreenConfig {
                universe_path: universe,
                prices_path: prices,
                output,
            },
        ),
        Commands::Ingest { input, coerce } => {
            ingest(&app_config, IngestConfig { input, coerce })
        }
        Commands::Audit { mark } => audit(&app_config, mark),
        Commands::Repair {
            id,
            year,
            field,
            value,
        } => repair(
            &app_config,
            RepairConfig {
                id,
                year,
                field,
                value,
            },
        ),
        Commands::ListMissing { universe } => list_missing(&app_config, &universe),
    };

    if let Err(err) = result {
        error!(error = %err, "명령 실행 실패");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
