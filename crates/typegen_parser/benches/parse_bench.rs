use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use typegen_parser::parse_source_file;

// An agent module mixing declarations with code the parser must skip.
const AGENT_SOURCE: &str = r#"
import { agent, prompt, description, BaseAgent } from "@golemcloud/golem-ts-sdk";

export interface Location {
    city: string;
    country?: string;
    coordinates: [lat: number, lon: number];
}

export type Unit = "metric" | "imperial";

export interface Forecast {
    location: Location;
    days: Array<DailyForecast>;
    unit: Unit;
    alerts: Record<string, string[]>;
}

interface DailyForecast {
    date: string;
    high: number;
    low: number;
    summary: string | null;
}

export enum Severity { Info, Warning = 10, Critical = "critical" }

type ApiConfig = {
    endpoint: string;
    apiSecret: Secret<string>;
    retry: { attempts: number; backoffMs: number };
};

@agent()
export class WeatherAgent extends BaseAgent {
    private readonly cache = new Map<string, Forecast>();

    constructor(readonly region: string, config: Config<ApiConfig>) {
        super();
        this.region = region.trim();
    }

    @prompt("Fetch a forecast for a city")
    @description("Returns a multi-day forecast")
    async forecast(location: Location, days: number = 3): Promise<Forecast> {
        const cached = this.cache.get(location.city);
        if (cached && cached.days.length >= days) {
            return cached;
        }
        const url = `${this.region}/forecast?city=${encodeURIComponent(location.city)}`;
        const response = await fetch(url, { headers: { accept: "application/json" } });
        return (await response.json()) as Forecast;
    }

    severity(level: Severity, note?: string): Severity | undefined {
        return level === Severity.Info ? undefined : level;
    }

    private log(message: string): void {
        console.log(/\d+/.test(message) ? message : `[${this.region}] ${message}`);
    }
}

export const helpers = {
    toCelsius: (f: number) => ((f - 32) * 5) / 9,
};
"#;

fn bench_parse_agent_module(c: &mut Criterion) {
    c.bench_function("parse_agent_module", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let (source_file, diagnostics) =
                parse_source_file(&arena, "weather.ts", black_box(AGENT_SOURCE));
            black_box((source_file.statements.len(), diagnostics.len()));
        });
    });
}

criterion_group!(benches, bench_parse_agent_module);
criterion_main!(benches);
